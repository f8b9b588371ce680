use std::sync::Arc;

use registry_core::domain::customer::{Address, Customer, CustomerChanges, NewCustomer, TaxId};
use registry_core::errors::{ApplicationError, DomainError};
use registry_core::registry::CustomerRegistry;
use registry_core::store::CustomerStore;
use registry_db::{
    connect, migrations, DemoDataset, InMemoryCustomerRepository, SqlCustomerRepository,
};

type ContractResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

fn tax_id(raw: &str) -> ContractResult<TaxId> {
    TaxId::new(raw).map_err(|error| error.to_string())
}

/// Registry behaviour every store must reproduce.
async fn run_contract(store: Arc<dyn CustomerStore>) -> ContractResult {
    let registry = CustomerRegistry::new(Arc::clone(&store));

    let saved = registry
        .registration
        .register(NewCustomer {
            name: Some("Jane Roe".to_string()),
            tax_id: tax_id("111")?,
            birth_date: None,
            address: Some(Address { street: Some("A".to_string()), ..Address::default() }),
        })
        .await
        .map_err(|error| error.to_string())?;

    let duplicate = registry
        .registration
        .register(NewCustomer {
            name: None,
            tax_id: tax_id("111")?,
            birth_date: None,
            address: None,
        })
        .await;
    let expected: Result<Customer, ApplicationError> =
        Err(DomainError::DuplicateTaxId { tax_id: tax_id("111")? }.into());
    require_eq!(duplicate, expected);

    let updated = registry
        .updates
        .update(
            saved.id,
            CustomerChanges {
                name: None,
                birth_date: None,
                address: Some(Address { city: Some("C1".to_string()), ..Address::default() }),
            },
        )
        .await
        .map_err(|error| error.to_string())?;
    require_eq!(updated.name, None::<String>);
    require!(
        updated.address.as_ref().and_then(|a| a.street.as_deref()) == Some("A"),
        "street should survive a partial address update: {updated:?}"
    );

    let seeded = DemoDataset::load(Arc::clone(&store))
        .await
        .map_err(|error| error.to_string())?;
    require_eq!(seeded.inserted.len(), 3);

    let listed = registry.queries.list_all().await.map_err(|error| error.to_string())?;
    require_eq!(listed.len(), 4);
    require!(
        listed.windows(2).all(|pair| pair[0].id < pair[1].id),
        "list should be ordered by id: {listed:?}"
    );

    Ok(())
}

#[tokio::test]
async fn in_memory_store_honours_the_registry_contract() -> ContractResult {
    run_contract(Arc::new(InMemoryCustomerRepository::default())).await
}

#[tokio::test]
async fn sql_store_honours_the_registry_contract() -> ContractResult {
    let pool = connect("sqlite::memory:").await.map_err(|error| error.to_string())?;
    migrations::run_pending(&pool).await.map_err(|error| error.to_string())?;

    let outcome = run_contract(Arc::new(SqlCustomerRepository::new(pool.clone()))).await;
    pool.close().await;
    outcome
}
