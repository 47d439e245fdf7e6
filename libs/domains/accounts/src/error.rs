use database::DatabaseError;
use thiserror::Error;
use uuid::Uuid;

/// Category of a domain error, for callers that map errors onto a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected input; the caller can correct it and retry
    Validation,
    /// The request referenced something that does not exist
    InvalidArgument,
    /// The requester is not allowed to perform the operation
    Security,
    /// Lookup of a named entity failed
    NotFound,
    /// Infrastructure failure
    Internal,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Username must be at least {min} characters long")]
    UsernameTooShort { min: usize },

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Username '{0}' is already taken")]
    UsernameAlreadyTaken(String),

    #[error("Bad credentials")]
    BadCredentials,

    #[error("User '{0}' not found")]
    NotFound(String),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::UsernameTooShort { .. }
            | AccountError::PasswordTooShort { .. }
            | AccountError::UsernameAlreadyTaken(_) => ErrorKind::Validation,
            AccountError::BadCredentials => ErrorKind::Security,
            AccountError::NotFound(_) | AccountError::UserNotFound(_) => ErrorKind::NotFound,
            AccountError::PasswordHash(_) | AccountError::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<DatabaseError> for AccountError {
    fn from(err: DatabaseError) -> Self {
        AccountError::Database(err.to_string())
    }
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        AccountError::Database(err.to_string())
    }
}
