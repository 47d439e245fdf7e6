use async_trait::async_trait;
use database::{DatabaseResult, UnitOfWork};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{AccountError, AccountResult},
    models::User,
    repository::{UserRepository, UserStore},
};

/// PostgreSQL implementation of UserStore using SeaORM
#[derive(Clone)]
pub struct PgUserStore {
    db: DatabaseConnection,
}

impl PgUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    type Unit = PgUserUnit;

    async fn begin(&self) -> AccountResult<PgUserUnit> {
        let txn = self.db.begin().await?;
        Ok(PgUserUnit { txn })
    }
}

/// One database transaction over the users table
pub struct PgUserUnit {
    txn: DatabaseTransaction,
}

#[async_trait]
impl UnitOfWork for PgUserUnit {
    async fn commit(self) -> DatabaseResult<()> {
        UnitOfWork::commit(self.txn).await
    }

    async fn rollback(self) -> DatabaseResult<()> {
        UnitOfWork::rollback(self.txn).await
    }
}

fn map_insert_error(err: DbErr, username: String) -> AccountError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::UsernameAlreadyTaken(username),
        _ => AccountError::Database(err.to_string()),
    }
}

#[async_trait]
impl UserRepository for PgUserUnit {
    async fn find_by_username(&self, username: &str) -> AccountResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .one(&self.txn)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_id(&self, id: Uuid) -> AccountResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.txn).await?;
        Ok(model.map(Into::into))
    }

    async fn exists_by_username(&self, username: &str) -> AccountResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .count(&self.txn)
            .await?;

        Ok(count > 0)
    }

    async fn save(&self, user: User) -> AccountResult<User> {
        let username = user.username.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = active_model
            .insert(&self.txn)
            .await
            .map_err(|e| map_insert_error(e, username))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }
}
