use chrono::NaiveDate;
use serde::Serialize;

use registry_core::domain::customer::{Address, CustomerId, NewCustomer, TaxId};
use registry_core::errors::{ApplicationError, DomainError};
use registry_core::registry::RegistrationService;
use registry_core::store::CustomerStore;

struct SeedCustomer {
    name: &'static str,
    tax_id: &'static str,
    birth_date: Option<(i32, u32, u32)>,
    address: Option<SeedAddress>,
}

struct SeedAddress {
    street: &'static str,
    number: &'static str,
    postal_code: &'static str,
    city: &'static str,
    state: &'static str,
}

/// Deterministic demo customers used by `registry seed` and smoke tests.
const SEED_CUSTOMERS: &[SeedCustomer] = &[
    SeedCustomer {
        name: "Jane Roe",
        tax_id: "111.444.777-35",
        birth_date: Some((1990, 1, 15)),
        address: Some(SeedAddress {
            street: "Avenida Paulista",
            number: "1578",
            postal_code: "01310-200",
            city: "Sao Paulo",
            state: "SP",
        }),
    },
    SeedCustomer {
        name: "John Doe",
        tax_id: "529.982.247-25",
        birth_date: Some((1984, 7, 2)),
        address: None,
    },
    SeedCustomer {
        name: "Maria Silva",
        tax_id: "390.533.447-05",
        birth_date: None,
        address: Some(SeedAddress {
            street: "Rua XV de Novembro",
            number: "50",
            postal_code: "80020-310",
            city: "Curitiba",
            state: "PR",
        }),
    },
];

pub struct DemoDataset;

impl DemoDataset {
    pub fn customers() -> Vec<NewCustomer> {
        SEED_CUSTOMERS.iter().filter_map(to_new_customer).collect()
    }

    /// Registers every demo customer whose tax id is not stored yet. Re-running is a no-op.
    pub async fn load<S: CustomerStore>(store: S) -> Result<SeedResult, ApplicationError> {
        let registration = RegistrationService::new(store);
        let mut result = SeedResult::default();

        for candidate in Self::customers() {
            match registration.register(candidate).await {
                Ok(saved) => result.inserted.push(saved.id),
                Err(ApplicationError::Domain(DomainError::DuplicateTaxId { tax_id })) => {
                    result.skipped.push(tax_id.to_string());
                }
                Err(error) => return Err(error),
            }
        }

        Ok(result)
    }
}

fn to_new_customer(seed: &SeedCustomer) -> Option<NewCustomer> {
    let tax_id = TaxId::new(seed.tax_id).ok()?;
    Some(NewCustomer {
        name: Some(seed.name.to_string()),
        tax_id,
        birth_date: seed.birth_date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        address: seed.address.as_ref().map(|address| Address {
            street: Some(address.street.to_string()),
            number: Some(address.number.to_string()),
            postal_code: Some(address.postal_code.to_string()),
            city: Some(address.city.to_string()),
            state: Some(address.state.to_string()),
        }),
    })
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedResult {
    pub inserted: Vec<CustomerId>,
    pub skipped: Vec<String>,
}
