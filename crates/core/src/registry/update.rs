use tracing::{info, warn};

use crate::domain::customer::{Customer, CustomerChanges, CustomerId};
use crate::errors::{ApplicationError, DomainError};
use crate::store::CustomerStore;

pub struct UpdateService<S> {
    store: S,
}

impl<S: CustomerStore> UpdateService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the record, applies `changes` through [`Customer::apply_changes`] and persists
    /// the result. The stored id and tax id are never altered. An unknown id fails with
    /// `CustomerNotFound` before any write is attempted.
    pub async fn update(
        &self,
        id: CustomerId,
        changes: CustomerChanges,
    ) -> Result<Customer, ApplicationError> {
        let Some(mut existing) = self.store.find_by_id(id).await? else {
            warn!(
                event_name = "registry.update.not_found",
                customer_id = %id,
                "update target does not exist"
            );
            return Err(DomainError::CustomerNotFound { id }.into());
        };

        let address_supplied = changes.address.is_some();
        existing.apply_changes(changes);

        let updated = self.store.update(existing).await?;
        info!(
            event_name = "registry.update.saved",
            customer_id = %updated.id,
            tax_id = %updated.tax_id,
            address_supplied,
            "customer updated"
        );
        Ok(updated)
    }
}
