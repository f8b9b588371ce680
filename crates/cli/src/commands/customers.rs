//! Customer commands backed by the configured SQLite store.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;

use registry_core::config::LoadOptions;
use registry_core::domain::customer::{Address, CustomerChanges, CustomerId, NewCustomer, TaxId};
use registry_core::errors::ApplicationError;
use registry_core::registry::CustomerRegistry;
use registry_db::{DbPool, SqlCustomerRepository};

use crate::commands::{execute, open_database, CommandResult, Failure};

#[derive(Debug, Clone, Default, Args)]
pub struct AddressArgs {
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
}

impl AddressArgs {
    /// `None` when no address flag was passed.
    fn into_address(self) -> Option<Address> {
        let address = Address {
            street: self.street,
            number: self.number,
            postal_code: self.postal_code,
            city: self.city,
            state: self.state,
        };
        (!address.is_empty()).then_some(address)
    }
}

#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub tax_id: String,
    #[arg(long, help = "Birth date as YYYY-MM-DD")]
    pub birth_date: Option<NaiveDate>,
    #[command(flatten)]
    pub address: AddressArgs,
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct ShowArgs {
    #[arg(long)]
    pub tax_id: Option<String>,
    #[arg(long)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub id: i64,
    #[arg(long, help = "New name; omitting it clears the stored name")]
    pub name: Option<String>,
    #[arg(long, help = "New birth date as YYYY-MM-DD; omitting it clears the stored date")]
    pub birth_date: Option<NaiveDate>,
    #[command(flatten)]
    pub address: AddressArgs,
}

type Registry = CustomerRegistry<SqlCustomerRepository>;

/// Runs `work` against a registry and closes the pool regardless of the outcome.
async fn with_registry<T, F, Fut>(pool: DbPool, work: F) -> Result<T, Failure>
where
    F: FnOnce(Registry) -> Fut,
    Fut: std::future::Future<Output = Result<T, Failure>>,
{
    let registry = CustomerRegistry::new(Arc::new(SqlCustomerRepository::new(pool.clone())));
    let outcome = work(registry).await;
    pool.close().await;
    outcome
}

fn parse_tax_id(raw: String) -> Result<TaxId, Failure> {
    TaxId::new(raw).map_err(|error| Failure::from(ApplicationError::from(error)))
}

pub fn register(options: &LoadOptions, args: RegisterArgs) -> CommandResult {
    let outcome = execute("register", options, |config| async move {
        let candidate = NewCustomer {
            name: args.name,
            tax_id: parse_tax_id(args.tax_id)?,
            birth_date: args.birth_date,
            address: args.address.into_address(),
        };
        let pool = open_database(&config).await?;
        with_registry(pool, |registry| async move {
            Ok(registry.registration.register(candidate).await?)
        })
        .await
    });

    match outcome {
        Ok(customer) => CommandResult::success_with_data(
            "register",
            format!("registered customer {}", customer.id),
            &customer,
        ),
        Err(result) => result,
    }
}

pub fn list(options: &LoadOptions) -> CommandResult {
    let outcome = execute("list", options, |config| async move {
        let pool = open_database(&config).await?;
        with_registry(pool, |registry| async move { Ok(registry.queries.list_all().await?) }).await
    });

    match outcome {
        Ok(customers) => CommandResult::success_with_data(
            "list",
            format!("{} customers", customers.len()),
            &customers,
        ),
        Err(result) => result,
    }
}

pub fn show(options: &LoadOptions, args: ShowArgs) -> CommandResult {
    let outcome = execute("show", options, |config| async move {
        let id = args.id.map(CustomerId);
        let tax_id = args.tax_id.map(parse_tax_id).transpose()?;
        let pool = open_database(&config).await?;
        with_registry(pool, |registry| async move {
            let (found, key) = match (tax_id, id) {
                (Some(tax_id), _) => {
                    let found = registry.queries.find_by_tax_id(&tax_id).await?;
                    (found, format!("tax id `{tax_id}`"))
                }
                (None, Some(id)) => {
                    let found = registry.queries.find_by_id(id).await?;
                    (found, format!("id {id}"))
                }
                (None, None) => {
                    return Err(Failure::new("usage", "pass either --tax-id or --id", 2));
                }
            };
            found.ok_or_else(|| Failure::new("not_found", format!("no customer with {key}"), 6))
        })
        .await
    });

    match outcome {
        Ok(customer) => CommandResult::success_with_data(
            "show",
            format!("found customer {}", customer.id),
            &customer,
        ),
        Err(result) => result,
    }
}

pub fn update(options: &LoadOptions, args: UpdateArgs) -> CommandResult {
    let outcome = execute("update", options, |config| async move {
        let id = CustomerId(args.id);
        let changes = CustomerChanges {
            name: args.name,
            birth_date: args.birth_date,
            address: args.address.into_address(),
        };
        let pool = open_database(&config).await?;
        with_registry(pool, |registry| async move {
            Ok(registry.updates.update(id, changes).await?)
        })
        .await
    });

    match outcome {
        Ok(customer) => CommandResult::success_with_data(
            "update",
            format!("updated customer {}", customer.id),
            &customer,
        ),
        Err(result) => result,
    }
}
