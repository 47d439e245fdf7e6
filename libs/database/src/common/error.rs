/// Failures raised by the persistence plumbing
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A query or transaction failed
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Still unreachable after the last retry
    #[error("Could not connect after {attempts} attempt(s): {reason}")]
    ConnectionFailed { attempts: u32, reason: String },

    #[error("Invalid database configuration: {0}")]
    Config(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

#[cfg(feature = "config")]
impl From<core_config::ConfigError> for DatabaseError {
    fn from(err: core_config::ConfigError) -> Self {
        DatabaseError::Config(err.to_string())
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
