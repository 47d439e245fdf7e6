use async_trait::async_trait;
use chrono::Utc;
use database::{MemoryStore, StagedUnit, UnitOfWork};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{NewTask, Task};

/// Task persistence operations, executed inside one unit of work
///
/// Implementations can use different storage backends (PostgreSQL, in-memory).
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>>;

    /// Every task of `owner_id`, oldest first
    async fn find_all_by_owner(&self, owner_id: Uuid) -> TaskResult<Vec<Task>>;

    async fn exists_by_owner_and_name(&self, owner_id: Uuid, name: &str) -> TaskResult<bool>;

    /// Insert a task and assign its id. A `(owner, name)` collision fails with `Existing`.
    async fn save(&self, task: NewTask) -> TaskResult<Task>;

    /// Set the completion flag; `TaskNotFound` when the id is unknown
    async fn update_completed(&self, id: i64, completed: bool) -> TaskResult<Task>;

    /// Remove a task permanently; `TaskNotFound` when it is already gone
    async fn delete(&self, task: &Task) -> TaskResult<()>;
}

/// Opens units of work over the task table
#[async_trait]
pub trait TaskStore: Send + Sync {
    type Unit: TaskRepository + UnitOfWork;

    async fn begin(&self) -> TaskResult<Self::Unit>;
}

/// Committed contents of the in-memory task table
#[derive(Debug, Default, Clone)]
pub struct TaskTable {
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

/// In-memory implementation of TaskStore (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskStore {
    store: MemoryStore<TaskTable>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed tasks across all owners
    pub async fn len(&self) -> usize {
        self.store.snapshot().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    type Unit = StagedUnit<TaskTable>;

    async fn begin(&self) -> TaskResult<Self::Unit> {
        Ok(self.store.begin().await)
    }
}

#[async_trait]
impl TaskRepository for StagedUnit<TaskTable> {
    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>> {
        Ok(self.table().await.tasks.get(&id).cloned())
    }

    async fn find_all_by_owner(&self, owner_id: Uuid) -> TaskResult<Vec<Task>> {
        let table = self.table().await;

        // BTreeMap iterates in id order
        Ok(table
            .tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn exists_by_owner_and_name(&self, owner_id: Uuid, name: &str) -> TaskResult<bool> {
        let table = self.table().await;
        Ok(table
            .tasks
            .values()
            .any(|t| t.owner_id == owner_id && t.name == name))
    }

    async fn save(&self, task: NewTask) -> TaskResult<Task> {
        let mut table = self.table().await;

        if table
            .tasks
            .values()
            .any(|t| t.owner_id == task.owner_id && t.name == task.name)
        {
            return Err(TaskError::Existing(task.name));
        }

        table.last_id += 1;
        let task = Task {
            id: table.last_id,
            owner_id: task.owner_id,
            name: task.name,
            deadline: task.deadline,
            completed: false,
            created_at: Utc::now(),
        };
        table.tasks.insert(task.id, task.clone());

        tracing::debug!(task_id = task.id, "Staged task insert");
        Ok(task)
    }

    async fn update_completed(&self, id: i64, completed: bool) -> TaskResult<Task> {
        let mut table = self.table().await;
        let task = table.tasks.get_mut(&id).ok_or(TaskError::TaskNotFound)?;

        task.completed = completed;
        Ok(task.clone())
    }

    async fn delete(&self, task: &Task) -> TaskResult<()> {
        self.table()
            .await
            .tasks
            .remove(&task.id)
            .map(|_| ())
            .ok_or(TaskError::TaskNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(owner_id: Uuid, name: &str) -> NewTask {
        NewTask {
            owner_id,
            name: name.to_string(),
            deadline: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ids_follow_creation_order() {
        let store = InMemoryTaskStore::new();
        let owner = Uuid::now_v7();
        let unit = store.begin().await.unwrap();

        let first = unit.save(new_task(owner, "first")).await.unwrap();
        let second = unit.save(new_task(owner, "second")).await.unwrap();
        unit.commit().await.unwrap();

        assert!(first.id < second.id);

        let unit = store.begin().await.unwrap();
        let names: Vec<_> = unit
            .find_all_by_owner(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryTaskStore::new();
        let owner = Uuid::now_v7();
        let unit = store.begin().await.unwrap();

        let first = unit.save(new_task(owner, "first")).await.unwrap();
        unit.delete(&first).await.unwrap();
        let second = unit.save(new_task(owner, "second")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_find_all_by_owner_filters() {
        let store = InMemoryTaskStore::new();
        let (alice, bob) = (Uuid::now_v7(), Uuid::now_v7());
        let unit = store.begin().await.unwrap();

        unit.save(new_task(alice, "a1")).await.unwrap();
        unit.save(new_task(bob, "b1")).await.unwrap();
        unit.save(new_task(alice, "a2")).await.unwrap();

        assert_eq!(unit.find_all_by_owner(alice).await.unwrap().len(), 2);
        assert_eq!(unit.find_all_by_owner(bob).await.unwrap().len(), 1);
        assert!(unit.find_all_by_owner(Uuid::now_v7()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_name_unique_per_owner() {
        let store = InMemoryTaskStore::new();
        let (alice, bob) = (Uuid::now_v7(), Uuid::now_v7());
        let unit = store.begin().await.unwrap();

        unit.save(new_task(alice, "groceries")).await.unwrap();
        unit.save(new_task(bob, "groceries")).await.unwrap();
        let duplicate = unit.save(new_task(alice, "groceries")).await;

        assert!(matches!(duplicate, Err(TaskError::Existing(name)) if name == "groceries"));
        assert!(unit.exists_by_owner_and_name(alice, "groceries").await.unwrap());
        assert!(!unit.exists_by_owner_and_name(alice, "Groceries").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_completed() {
        let store = InMemoryTaskStore::new();
        let unit = store.begin().await.unwrap();
        let task = unit.save(new_task(Uuid::now_v7(), "report")).await.unwrap();
        assert!(!task.completed);

        let done = unit.update_completed(task.id, true).await.unwrap();
        assert!(done.completed);
        assert_eq!(done.name, task.name);
        assert_eq!(done.owner_id, task.owner_id);

        let missing = unit.update_completed(999, true).await;
        assert!(matches!(missing, Err(TaskError::TaskNotFound)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = InMemoryTaskStore::new();
        let unit = store.begin().await.unwrap();
        let task = unit.save(new_task(Uuid::now_v7(), "report")).await.unwrap();

        unit.delete(&task).await.unwrap();
        assert!(matches!(unit.delete(&task).await, Err(TaskError::TaskNotFound)));
        assert!(unit.find_by_id(task.id).await.unwrap().is_none());
    }
}
