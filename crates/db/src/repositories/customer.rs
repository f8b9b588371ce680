use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::Row;
use tracing::warn;

use registry_core::domain::customer::{Address, Customer, CustomerId, NewCustomer, TaxId};
use registry_core::store::{CustomerStore, StoreError};

use super::{stored_address, RepositoryError};
use crate::DbPool;

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_CUSTOMER: &str = "SELECT id, name, tax_id, birth_date, street, number, postal_code,
                                      city, state
                               FROM customer";

/// SQLite-backed customer store. Tax id uniqueness is enforced by the table's
/// `UNIQUE` constraint, and updates only touch rows that already exist.
pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_CUSTOMER} WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_customer).transpose()
    }
}

fn decode<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(column).map_err(|e| RepositoryError::Decode(format!("column `{column}`: {e}")))
}

fn row_to_customer(row: &SqliteRow) -> Result<Customer, RepositoryError> {
    let id: i64 = decode(row, "id")?;
    let birth_date = decode::<Option<String>>(row, "birth_date")?
        .map(|value| {
            NaiveDate::parse_from_str(&value, BIRTH_DATE_FORMAT).map_err(|e| {
                RepositoryError::Decode(format!("invalid birth_date `{value}` for customer {id}: {e}"))
            })
        })
        .transpose()?;
    let tax_id = TaxId::new(decode::<String>(row, "tax_id")?)
        .map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let address = Address {
        street: decode(row, "street")?,
        number: decode(row, "number")?,
        postal_code: decode(row, "postal_code")?,
        city: decode(row, "city")?,
        state: decode(row, "state")?,
    };

    Ok(Customer {
        id: CustomerId(id),
        name: decode(row, "name")?,
        tax_id,
        birth_date,
        address: stored_address(Some(address)),
    })
}

fn format_birth_date(birth_date: Option<NaiveDate>) -> Option<String> {
    birth_date.map(|date| date.format(BIRTH_DATE_FORMAT).to_string())
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error.as_database_error().map(|db| db.is_unique_violation()).unwrap_or(false)
}

#[async_trait::async_trait]
impl CustomerStore for SqlCustomerRepository {
    async fn save(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let now = Utc::now().to_rfc3339();
        let address = stored_address(customer.address.clone()).unwrap_or_default();

        let result = sqlx::query(
            "INSERT INTO customer (name, tax_id, birth_date, street, number, postal_code,
                                   city, state, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&customer.name)
        .bind(customer.tax_id.as_str())
        .bind(format_birth_date(customer.birth_date))
        .bind(&address.street)
        .bind(&address.number)
        .bind(&address.postal_code)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(error) if is_unique_violation(&error) => {
                warn!(
                    event_name = "db.customer.tax_id_conflict",
                    tax_id = %customer.tax_id,
                    "insert rejected by the tax id unique constraint"
                );
                return Err(StoreError::TaxIdTaken(customer.tax_id));
            }
            Err(error) => return Err(RepositoryError::from(error).into()),
        };

        let id = CustomerId(result.last_insert_rowid());
        self.fetch_by_id(id).await?.ok_or(StoreError::Missing(id))
    }

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_CUSTOMER} WHERE tax_id = ?"))
            .bind(tax_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        Ok(row.as_ref().map(row_to_customer).transpose()?)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.fetch_by_id(id).await?)
    }

    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let rows: Vec<SqliteRow> =
            sqlx::query(&format!("{SELECT_CUSTOMER} ORDER BY id ASC"))
                .fetch_all(&self.pool)
                .await
                .map_err(RepositoryError::from)?;

        Ok(rows.iter().map(row_to_customer).collect::<Result<Vec<_>, _>>()?)
    }

    async fn update(&self, customer: Customer) -> Result<Customer, StoreError> {
        let address = stored_address(customer.address.clone()).unwrap_or_default();

        let result = sqlx::query(
            "UPDATE customer
             SET name = ?, birth_date = ?, street = ?, number = ?, postal_code = ?,
                 city = ?, state = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&customer.name)
        .bind(format_birth_date(customer.birth_date))
        .bind(&address.street)
        .bind(&address.number)
        .bind(&address.postal_code)
        .bind(&address.city)
        .bind(&address.state)
        .bind(Utc::now().to_rfc3339())
        .bind(customer.id.0)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            warn!(
                event_name = "db.customer.update_missed",
                customer_id = %customer.id,
                "update matched no stored row"
            );
            return Err(StoreError::Missing(customer.id));
        }

        self.fetch_by_id(customer.id).await?.ok_or(StoreError::Missing(customer.id))
    }
}
