use database::DatabaseError;
use thiserror::Error;

pub use domain_accounts::ErrorKind;

pub const ACCESS_DENIED: &str = "You do not have permission to access this task";
pub const MODIFY_DENIED: &str = "You do not have permission to modify this task";

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task name cannot be empty")]
    Empty,

    #[error("Task name must be at least {min} characters long")]
    TooShort { min: usize },

    #[error("A task named '{0}' already exists")]
    Existing(String),

    #[error("Task not found")]
    TaskNotFound,

    #[error("You do not have permission to delete this task")]
    PermissionDenied,

    /// Ownership failure outside of deletion; carries the full message
    #[error("{0}")]
    AccessDenied(&'static str),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::Empty | TaskError::TooShort { .. } | TaskError::Existing(_) => {
                ErrorKind::Validation
            }
            TaskError::TaskNotFound => ErrorKind::InvalidArgument,
            TaskError::PermissionDenied | TaskError::AccessDenied(_) => ErrorKind::Security,
            TaskError::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<DatabaseError> for TaskError {
    fn from(err: DatabaseError) -> Self {
        TaskError::Database(err.to_string())
    }
}

impl From<sea_orm::DbErr> for TaskError {
    fn from(err: sea_orm::DbErr) -> Self {
        TaskError::Database(err.to_string())
    }
}
