use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Open a connection pool, retrying with backoff until `retry` is exhausted
pub async fn connect_with_retry(
    config: &PostgresConfig,
    retry: RetryConfig,
) -> DatabaseResult<DatabaseConnection> {
    let attempts = AtomicU32::new(0);

    let db = retry_with_backoff(
        || {
            attempts.fetch_add(1, Ordering::Relaxed);
            Database::connect(config.connect_options())
        },
        retry,
    )
    .await
    .map_err(|e| DatabaseError::ConnectionFailed {
        attempts: attempts.load(Ordering::Relaxed),
        reason: e.to_string(),
    })?;

    info!(
        max_connections = config.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(db)
}

/// Apply every pending migration of `M`
pub async fn run_migrations<M: MigratorTrait>(db: &DatabaseConnection) -> DatabaseResult<()> {
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    info!(migrations = M::migrations().len(), "Schema up to date");
    Ok(())
}
