//! Customer registration, update and query orchestration over a [`CustomerStore`].

mod query;
mod registration;
mod update;

use std::sync::Arc;

use crate::store::CustomerStore;

pub use query::QueryService;
pub use registration::RegistrationService;
pub use update::UpdateService;

/// The three orchestrators sharing one store.
pub struct CustomerRegistry<S: ?Sized> {
    pub registration: RegistrationService<Arc<S>>,
    pub updates: UpdateService<Arc<S>>,
    pub queries: QueryService<Arc<S>>,
}

impl<S> CustomerRegistry<S>
where
    S: CustomerStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            registration: RegistrationService::new(Arc::clone(&store)),
            updates: UpdateService::new(Arc::clone(&store)),
            queries: QueryService::new(store),
        }
    }
}
