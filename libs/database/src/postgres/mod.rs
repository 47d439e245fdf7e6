//! PostgreSQL pool setup and schema migration

mod config;
mod connector;

pub use config::PostgresConfig;
pub use connector::{connect_with_retry, run_migrations};

pub use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr};
pub use sea_orm_migration::MigratorTrait;
