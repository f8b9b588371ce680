use tracing::{info, warn};

use crate::domain::customer::{Customer, NewCustomer};
use crate::errors::{ApplicationError, DomainError};
use crate::store::CustomerStore;

/// Inserts customers while keeping the tax id unique.
pub struct RegistrationService<S> {
    store: S,
}

impl<S: CustomerStore> RegistrationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fails with `DuplicateTaxId` when the tax id is already stored; nothing is written then.
    /// A concurrent insert that slips past the lookup is caught by the store's own constraint
    /// and reported the same way.
    pub async fn register(&self, candidate: NewCustomer) -> Result<Customer, ApplicationError> {
        if self.store.find_by_tax_id(&candidate.tax_id).await?.is_some() {
            warn!(
                event_name = "registry.register.duplicate",
                tax_id = %candidate.tax_id,
                "tax id already registered"
            );
            return Err(DomainError::DuplicateTaxId { tax_id: candidate.tax_id }.into());
        }

        let saved = self.store.save(candidate).await?;
        info!(
            event_name = "registry.register.saved",
            customer_id = %saved.id,
            tax_id = %saved.tax_id,
            "customer registered"
        );
        Ok(saved)
    }
}
