//! Credential hashing collaborator.
//!
//! The service only depends on [`CredentialHasher`]; [`Argon2Hasher`] is the
//! default implementation and emits PHC strings (`$argon2id$v=19$...`) with a
//! fresh random salt per call.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::error::{AccountError, AccountResult};

/// Hashes plaintext credentials and checks plaintext against stored hashes
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AccountResult<String>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` cannot be parsed
    fn matches(&self, plaintext: &str, hash: &str) -> AccountResult<bool>;
}

/// Argon2id hasher
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Argon2id with the crate's recommended parameters
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Argon2id with explicit memory (KiB), iteration and lane counts
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> AccountResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AccountError::PasswordHash(format!("Invalid parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> AccountResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AccountError::PasswordHash(e.to_string()))
    }

    fn matches(&self, plaintext: &str, hash: &str) -> AccountResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| AccountError::PasswordHash(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AccountError::PasswordHash(e.to_string())),
        }
    }
}
