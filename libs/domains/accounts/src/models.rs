use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique identifier, fixed at signup
    pub id: Uuid,
    /// Unique login name
    pub username: String,
    /// Argon2 PHC string; never the plaintext and never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a not-yet-persisted user (the password must already be hashed)
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Signup payload
#[derive(Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

impl SignupRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
