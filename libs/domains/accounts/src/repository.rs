use async_trait::async_trait;
use database::{MemoryStore, StagedUnit, UnitOfWork};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::models::User;

/// User persistence operations, executed inside one unit of work
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AccountResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> AccountResult<Option<User>>;

    async fn exists_by_username(&self, username: &str) -> AccountResult<bool>;

    /// Insert a new user. A username collision fails with `UsernameAlreadyTaken`.
    async fn save(&self, user: User) -> AccountResult<User>;
}

/// Opens units of work over the user table
#[async_trait]
pub trait UserStore: Send + Sync {
    type Unit: UserRepository + UnitOfWork;

    async fn begin(&self) -> AccountResult<Self::Unit>;
}

/// Committed contents of the in-memory user table
#[derive(Debug, Default, Clone)]
pub struct UserTable {
    users: HashMap<Uuid, User>,
}

/// In-memory implementation of UserStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    store: MemoryStore<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed users
    pub async fn len(&self) -> usize {
        self.store.snapshot().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    type Unit = StagedUnit<UserTable>;

    async fn begin(&self) -> AccountResult<Self::Unit> {
        Ok(self.store.begin().await)
    }
}

#[async_trait]
impl UserRepository for StagedUnit<UserTable> {
    async fn find_by_username(&self, username: &str) -> AccountResult<Option<User>> {
        let table = self.table().await;
        Ok(table
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AccountResult<Option<User>> {
        Ok(self.table().await.users.get(&id).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> AccountResult<bool> {
        let table = self.table().await;
        Ok(table.users.values().any(|u| u.username == username))
    }

    async fn save(&self, user: User) -> AccountResult<User> {
        let mut table = self.table().await;

        if table.users.values().any(|u| u.username == user.username) {
            return Err(AccountError::UsernameAlreadyTaken(user.username));
        }

        table.users.insert(user.id, user.clone());
        tracing::debug!(user_id = %user.id, "Staged user insert");
        Ok(user)
    }
}
