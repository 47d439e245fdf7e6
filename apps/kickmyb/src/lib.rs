//! Composition root for the KickMyB services
//!
//! Reads [`Config`] from the environment, installs error reporting and
//! tracing, connects to PostgreSQL, brings the schema up to date and wires the
//! account and task services onto the shared pool.
//!
//! ```rust,no_run
//! # async fn run() -> eyre::Result<()> {
//! let services = kickmyb::bootstrap().await?;
//! let alice = services.accounts.resolve_by_username("alice").await?;
//! let tasks = services.tasks.home(alice.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;

use core_config::tracing::{init_tracing, install_color_eyre};
use database::DatabaseResult;
use database::postgres::{connect_with_retry, run_migrations};
use domain_accounts::{AccountService, Argon2Hasher, PgUserStore};
use domain_tasks::{PgTaskStore, TaskService};
use migration::Migrator;
use tracing::info;

pub use config::Config;

/// Services sharing one connection pool
#[derive(Clone)]
pub struct Services {
    pub accounts: AccountService<PgUserStore, Argon2Hasher>,
    pub tasks: TaskService<PgTaskStore>,
}

/// Connect with the configured retries, migrate, then build both services
pub async fn connect_services(config: &Config) -> DatabaseResult<Services> {
    let db = connect_with_retry(&config.database, config.database.retry_policy()).await?;
    run_migrations::<Migrator>(&db).await?;

    Ok(Services {
        accounts: AccountService::with_policy(
            PgUserStore::new(db.clone()),
            Argon2Hasher::new(),
            config.accounts,
        ),
        tasks: TaskService::with_policy(PgTaskStore::new(db), config.tasks),
    })
}

/// Full start-up sequence driven by environment variables
pub async fn bootstrap() -> eyre::Result<Services> {
    // Before anything fallible so the report hook formats start-up errors
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let services = connect_services(&config)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL start-up failed: {}", e))?;

    info!(
        environment = ?config.environment,
        min_task_name_len = config.tasks.min_name_len,
        "Services ready"
    );
    Ok(services)
}
