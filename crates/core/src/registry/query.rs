use tracing::debug;

use crate::domain::customer::{Customer, CustomerId, TaxId};
use crate::errors::ApplicationError;
use crate::store::CustomerStore;

/// Read-only pass-through to the store. Absence is `Ok(None)`, never an error.
pub struct QueryService<S> {
    store: S,
}

impl<S: CustomerStore> QueryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, ApplicationError> {
        let found = self.store.find_by_tax_id(tax_id).await?;
        debug!(
            event_name = "registry.query.by_tax_id",
            tax_id = %tax_id,
            found = found.is_some(),
            "customer lookup by tax id"
        );
        Ok(found)
    }

    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, ApplicationError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Customer>, ApplicationError> {
        let customers = self.store.find_all().await?;
        debug!(event_name = "registry.query.list", count = customers.len(), "listed customers");
        Ok(customers)
    }
}
