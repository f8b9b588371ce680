use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::customer::{Customer, CustomerId, NewCustomer, TaxId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The storage layer's own uniqueness constraint on the tax id fired.
    #[error("tax id `{0}` violates the storage uniqueness constraint")]
    TaxIdTaken(TaxId),
    /// A conditional write matched no stored record.
    #[error("no stored customer with id {0}")]
    Missing(CustomerId),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Persistence capability the registry orchestrators depend on.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Inserts a new record and returns it with the storage-assigned id.
    async fn save(&self, customer: NewCustomer) -> Result<Customer, StoreError>;

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, StoreError>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// All records, ordered by ascending id.
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError>;

    /// Persists an existing record, identified by its id, and returns the stored state.
    async fn update(&self, customer: Customer) -> Result<Customer, StoreError>;
}

#[async_trait]
impl<S> CustomerStore for Arc<S>
where
    S: CustomerStore + ?Sized,
{
    async fn save(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        (**self).save(customer).await
    }

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, StoreError> {
        (**self).find_by_tax_id(tax_id).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        (**self).find_all().await
    }

    async fn update(&self, customer: Customer) -> Result<Customer, StoreError> {
        (**self).update(customer).await
    }
}
