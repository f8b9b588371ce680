pub mod config;
pub mod domain;
pub mod errors;
pub mod registry;
pub mod store;

pub use domain::customer::{Address, Customer, CustomerChanges, CustomerId, NewCustomer, TaxId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use registry::{CustomerRegistry, QueryService, RegistrationService, UpdateService};
pub use store::{CustomerStore, StoreError};
