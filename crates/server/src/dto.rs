//! JSON shapes exchanged with HTTP clients and their mapping to domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use registry_core::domain::customer::{Address, Customer, CustomerChanges, NewCustomer, TaxId};
use registry_core::errors::DomainError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBody {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Inbound body for both create and update. `taxId` is ignored on update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<AddressBody>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i64,
    pub name: Option<String>,
    pub tax_id: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<AddressBody>,
}

impl CustomerRequest {
    pub fn into_new_customer(self) -> Result<NewCustomer, DomainError> {
        let tax_id = self
            .tax_id
            .ok_or_else(|| DomainError::InvariantViolation("taxId is required".to_string()))?;

        Ok(NewCustomer {
            name: self.name,
            tax_id: TaxId::new(tax_id)?,
            birth_date: self.birth_date,
            address: self.address.map(Address::from),
        })
    }

    pub fn into_changes(self) -> CustomerChanges {
        CustomerChanges {
            name: self.name,
            birth_date: self.birth_date,
            address: self.address.map(Address::from),
        }
    }
}

impl From<AddressBody> for Address {
    fn from(body: AddressBody) -> Self {
        Address {
            street: body.street,
            number: body.number,
            postal_code: body.postal_code,
            city: body.city,
            state: body.state,
        }
    }
}

impl From<Address> for AddressBody {
    fn from(address: Address) -> Self {
        AddressBody {
            street: address.street,
            number: address.number,
            postal_code: address.postal_code,
            city: address.city,
            state: address.state,
        }
    }
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        CustomerResponse {
            id: customer.id.0,
            name: customer.name,
            tax_id: customer.tax_id.into(),
            birth_date: customer.birth_date,
            address: customer.address.map(AddressBody::from),
        }
    }
}
