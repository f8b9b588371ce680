use std::collections::BTreeMap;

use tokio::sync::RwLock;

use registry_core::domain::customer::{Customer, CustomerId, NewCustomer, TaxId};
use registry_core::store::{CustomerStore, StoreError};

use super::stored_address;

#[derive(Default)]
struct CustomerTable {
    rows: BTreeMap<i64, Customer>,
    last_id: i64,
}

/// Process-local store. Uniqueness and existence are checked under the write lock,
/// so it offers the same guarantees as the SQL table.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    table: RwLock<CustomerTable>,
}

#[async_trait::async_trait]
impl CustomerStore for InMemoryCustomerRepository {
    async fn save(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|row| row.tax_id == customer.tax_id) {
            return Err(StoreError::TaxIdTaken(customer.tax_id));
        }

        table.last_id += 1;
        let id = CustomerId(table.last_id);
        let mut saved = customer.into_customer(id);
        saved.address = stored_address(saved.address);
        table.rows.insert(id.0, saved.clone());
        Ok(saved)
    }

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|row| &row.tax_id == tax_id).cloned())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id.0).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn update(&self, customer: Customer) -> Result<Customer, StoreError> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.get_mut(&customer.id.0) else {
            return Err(StoreError::Missing(customer.id));
        };

        // The stored tax id is authoritative.
        row.name = customer.name;
        row.birth_date = customer.birth_date;
        row.address = stored_address(customer.address);
        Ok(row.clone())
    }
}
