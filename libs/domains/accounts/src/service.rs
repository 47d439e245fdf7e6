use database::finish_unit;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::hashing::CredentialHasher;
use crate::models::{SignupRequest, User};
use crate::policy::AccountPolicy;
use crate::repository::{UserRepository, UserStore};

/// Service layer for account registration and authentication
pub struct AccountService<S: UserStore, H: CredentialHasher> {
    store: Arc<S>,
    hasher: Arc<H>,
    policy: AccountPolicy,
}

impl<S: UserStore, H: CredentialHasher> Clone for AccountService<S, H> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            hasher: Arc::clone(&self.hasher),
            policy: self.policy,
        }
    }
}

impl<S, H> AccountService<S, H>
where
    S: UserStore,
    H: CredentialHasher + 'static,
{
    pub fn new(store: S, hasher: H) -> Self {
        Self::with_policy(store, hasher, AccountPolicy::default())
    }

    pub fn with_policy(store: S, hasher: H, policy: AccountPolicy) -> Self {
        Self {
            store: Arc::new(store),
            hasher: Arc::new(hasher),
            policy,
        }
    }

    pub fn policy(&self) -> &AccountPolicy {
        &self.policy
    }

    /// Register a new user
    ///
    /// Checks, in order: username length, password length, username uniqueness.
    /// Nothing is persisted when any check fails.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> AccountResult<User> {
        self.validate_signup(&request)?;

        let unit = self.store.begin().await?;
        let result = self.register(&unit, request).await;
        let user = finish_unit(unit, result).await?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both yield `BadCredentials`.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> AccountResult<User> {
        let unit = self.store.begin().await?;
        let found = unit.find_by_username(username).await;
        let user = finish_unit(unit, found).await?;

        let Some(user) = user else {
            tracing::warn!("Authentication failed: unknown username");
            return Err(AccountError::BadCredentials);
        };

        if !self.password_matches(password, &user.password_hash).await? {
            tracing::warn!(user_id = %user.id, "Authentication failed: wrong password");
            return Err(AccountError::BadCredentials);
        }

        Ok(user)
    }

    /// Look up a user by username
    #[instrument(skip(self))]
    pub async fn resolve_by_username(&self, username: &str) -> AccountResult<User> {
        let unit = self.store.begin().await?;
        let found = unit.find_by_username(username).await;

        finish_unit(unit, found)
            .await?
            .ok_or_else(|| AccountError::NotFound(username.to_string()))
    }

    /// Look up a user by id
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn resolve_by_id(&self, id: Uuid) -> AccountResult<User> {
        let unit = self.store.begin().await?;
        let found = unit.find_by_id(id).await;

        finish_unit(unit, found)
            .await?
            .ok_or(AccountError::UserNotFound(id))
    }

    async fn register(&self, unit: &S::Unit, request: SignupRequest) -> AccountResult<User> {
        if unit.exists_by_username(&request.username).await? {
            return Err(AccountError::UsernameAlreadyTaken(request.username));
        }

        let password_hash = self.hash_password(request.password).await?;
        unit.save(User::new(request.username, password_hash)).await
    }

    fn validate_signup(&self, request: &SignupRequest) -> AccountResult<()> {
        if request.username.chars().count() < self.policy.min_username_len {
            return Err(AccountError::UsernameTooShort {
                min: self.policy.min_username_len,
            });
        }

        if request.password.chars().count() < self.policy.min_password_len {
            return Err(AccountError::PasswordTooShort {
                min: self.policy.min_password_len,
            });
        }

        Ok(())
    }

    // Hashing is CPU-bound; keep it off the async workers

    async fn hash_password(&self, password: String) -> AccountResult<String> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::PasswordHash(e.to_string()))?
    }

    async fn password_matches(&self, password: &str, hash: &str) -> AccountResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.matches(&password, &hash))
            .await
            .map_err(|e| AccountError::PasswordHash(e.to_string()))?
    }
}
