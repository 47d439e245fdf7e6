//! Accounts Domain
//!
//! Registration, authentication and user lookup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Validation, uniqueness, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │    Store    │  ← Opens a unit of work (in-memory or Postgres)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access inside that unit
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_accounts::{AccountService, Argon2Hasher, InMemoryUserStore, SignupRequest};
//!
//! # async fn run() -> domain_accounts::AccountResult<()> {
//! let service = AccountService::new(InMemoryUserStore::new(), Argon2Hasher::new());
//!
//! let alice = service.signup(SignupRequest::new("alice", "Passw0rd!")).await?;
//! let same = service.authenticate("alice", "Passw0rd!").await?;
//! assert_eq!(alice.id, same.id);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod hashing;
pub mod models;
pub mod policy;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{AccountError, AccountResult, ErrorKind};
pub use hashing::{Argon2Hasher, CredentialHasher};
pub use models::{SignupRequest, User};
pub use policy::AccountPolicy;
pub use postgres::{PgUserStore, PgUserUnit};
pub use repository::{InMemoryUserStore, UserRepository, UserStore};
pub use service::AccountService;
