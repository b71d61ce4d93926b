use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryPolicy, retry_with_backoff};

/// Connect to PostgreSQL with the default pool settings
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    connect_with_options(PostgresConfig::new(database_url).into_connect_options()).await
}

/// Connect with explicit SeaORM options
pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Connect from config, retrying with exponential backoff.
///
/// Used at startup where the database may still be booting alongside the service.
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    policy: Option<RetryPolicy>,
) -> DatabaseResult<DatabaseConnection> {
    let policy = policy.unwrap_or_default();
    let options = config.into_connect_options();

    retry_with_backoff("postgres.connect", &policy, || {
        connect_with_options(options.clone())
    })
    .await
    .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Apply every pending migration of `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!(app = app_name, "Migrations completed");
    Ok(())
}
