use std::sync::Arc;

use registry_core::config::{AppConfig, ConfigError, LoadOptions};
use registry_core::registry::CustomerRegistry;
use registry_core::store::CustomerStore;
use registry_db::{connect_with_config, migrations, DbPool, SqlCustomerRepository};
use thiserror::Error;
use tracing::info;

use crate::api::SharedRegistry;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub registry: SharedRegistry,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let store: Arc<dyn CustomerStore> = Arc::new(SqlCustomerRepository::new(db_pool.clone()));
    let registry = Arc::new(CustomerRegistry::new(store));

    Ok(Application { config, db_pool, registry })
}

#[cfg(test)]
mod tests {
    use registry_core::config::{ConfigOverrides, LoadOptions};
    use registry_core::domain::customer::{CustomerChanges, NewCustomer, TaxId};
    use registry_core::errors::{ApplicationError, DomainError};

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn in_memory_options() -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_rejects_non_sqlite_database_url() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("postgres://localhost/registry".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        let error = result.err().expect("config error");
        assert!(matches!(error, BootstrapError::Config(_)));
        assert!(error.to_string().contains("database.url"));
    }

    #[tokio::test]
    async fn bootstrap_exposes_a_working_registry_over_migrated_schema() {
        let app = bootstrap(in_memory_options()).await.expect("bootstrap should succeed");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'customer'",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("customer table lookup");
        assert_eq!(table_count, 1);

        let tax_id = TaxId::new("111").expect("tax id");
        let saved = app
            .registry
            .registration
            .register(NewCustomer {
                name: Some("Jane Roe".to_string()),
                tax_id: tax_id.clone(),
                birth_date: None,
                address: None,
            })
            .await
            .expect("register");

        let duplicate = app
            .registry
            .registration
            .register(NewCustomer {
                name: Some("Other".to_string()),
                tax_id: tax_id.clone(),
                birth_date: None,
                address: None,
            })
            .await;
        assert_eq!(
            duplicate,
            Err(ApplicationError::Domain(DomainError::DuplicateTaxId { tax_id: tax_id.clone() }))
        );

        let updated = app
            .registry
            .updates
            .update(
                saved.id,
                CustomerChanges { name: Some("Jane R. Roe".to_string()), ..CustomerChanges::default() },
            )
            .await
            .expect("update");
        assert_eq!(updated.tax_id, tax_id);

        let listed = app.registry.queries.list_all().await.expect("list");
        assert_eq!(listed, vec![updated]);

        app.db_pool.close().await;
    }
}
