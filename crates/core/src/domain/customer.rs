use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub i64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// National tax identifier; the natural key of a customer.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

impl TaxId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvariantViolation("tax id must not be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaxId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaxId> for String {
    fn from(value: TaxId) -> Self {
        value.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Postal address owned by a single customer. `None` means "not supplied".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.number.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.state.is_none()
    }

    /// Overwrites every field `incoming` supplies. An empty string counts as supplied.
    pub fn merge(&mut self, incoming: Address) {
        let Address { street, number, postal_code, city, state } = incoming;
        overwrite(&mut self.street, street);
        overwrite(&mut self.number, number);
        overwrite(&mut self.postal_code, postal_code);
        overwrite(&mut self.city, city);
        overwrite(&mut self.state, state);
    }
}

fn overwrite(target: &mut Option<String>, incoming: Option<String>) {
    if incoming.is_some() {
        *target = incoming;
    }
}

/// Registration candidate. Carries no surrogate id; storage assigns one on save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: Option<String>,
    pub tax_id: TaxId,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<Address>,
}

impl NewCustomer {
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            tax_id: self.tax_id,
            birth_date: self.birth_date,
            address: self.address,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: Option<String>,
    pub tax_id: TaxId,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<Address>,
}

/// Field values requested by an update. The tax id is deliberately absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<Address>,
}

impl Customer {
    /// Name and birth date are replaced outright, even by `None`. The address is
    /// adopted when the record has none and merged field by field otherwise; an
    /// absent incoming address leaves the stored one alone.
    pub fn apply_changes(&mut self, changes: CustomerChanges) {
        let CustomerChanges { name, birth_date, address } = changes;
        self.name = name;
        self.birth_date = birth_date;

        let Some(incoming) = address else {
            return;
        };
        match self.address.as_mut() {
            Some(existing) => existing.merge(incoming),
            None => self.address = Some(incoming),
        }
    }
}
