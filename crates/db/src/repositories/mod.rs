use thiserror::Error;

use registry_core::domain::customer::Address;
use registry_core::store::StoreError;

pub mod customer;
pub mod memory;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryCustomerRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for StoreError {
    fn from(value: RepositoryError) -> Self {
        StoreError::Backend(value.to_string())
    }
}

/// An address with no field set is stored as no address at all.
pub(crate) fn stored_address(address: Option<Address>) -> Option<Address> {
    address.filter(|address| !address.is_empty())
}
