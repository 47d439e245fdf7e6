use async_trait::async_trait;
use database::{DatabaseResult, UnitOfWork};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{NewTask, Task},
    repository::{TaskRepository, TaskStore},
};

/// PostgreSQL implementation of TaskStore using SeaORM
#[derive(Clone)]
pub struct PgTaskStore {
    db: DatabaseConnection,
}

impl PgTaskStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    type Unit = PgTaskUnit;

    async fn begin(&self) -> TaskResult<PgTaskUnit> {
        let txn = self.db.begin().await?;
        Ok(PgTaskUnit { txn })
    }
}

/// One database transaction over the tasks table
pub struct PgTaskUnit {
    txn: DatabaseTransaction,
}

#[async_trait]
impl UnitOfWork for PgTaskUnit {
    async fn commit(self) -> DatabaseResult<()> {
        UnitOfWork::commit(self.txn).await
    }

    async fn rollback(self) -> DatabaseResult<()> {
        UnitOfWork::rollback(self.txn).await
    }
}

fn map_insert_error(err: DbErr, name: String) -> TaskError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => TaskError::Existing(name),
        _ => TaskError::Database(err.to_string()),
    }
}

#[async_trait]
impl TaskRepository for PgTaskUnit {
    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>> {
        let model = entity::Entity::find_by_id(id).one(&self.txn).await?;
        Ok(model.map(Into::into))
    }

    async fn find_all_by_owner(&self, owner_id: Uuid) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::OwnerId.eq(owner_id))
            .order_by_asc(entity::Column::Id)
            .all(&self.txn)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn exists_by_owner_and_name(&self, owner_id: Uuid, name: &str) -> TaskResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::OwnerId.eq(owner_id))
            .filter(entity::Column::Name.eq(name))
            .count(&self.txn)
            .await?;

        Ok(count > 0)
    }

    async fn save(&self, task: NewTask) -> TaskResult<Task> {
        let name = task.name.clone();
        let active_model: entity::ActiveModel = task.into();

        let model = active_model
            .insert(&self.txn)
            .await
            .map_err(|e| map_insert_error(e, name))?;

        tracing::info!(task_id = model.id, owner_id = %model.owner_id, "Created task");
        Ok(model.into())
    }

    async fn update_completed(&self, id: i64, completed: bool) -> TaskResult<Task> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.txn)
            .await?
            .ok_or(TaskError::TaskNotFound)?;

        let mut active_model: entity::ActiveModel = model.into();
        active_model.completed = Set(completed);
        let updated = active_model.update(&self.txn).await?;

        tracing::info!(task_id = id, completed, "Updated task");
        Ok(updated.into())
    }

    async fn delete(&self, task: &Task) -> TaskResult<()> {
        let result = entity::Entity::delete_by_id(task.id)
            .exec(&self.txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(TaskError::TaskNotFound);
        }

        tracing::info!(task_id = task.id, "Deleted task");
        Ok(())
    }
}
