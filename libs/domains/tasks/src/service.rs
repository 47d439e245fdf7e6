use database::finish_unit;
use domain_accounts::User;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ACCESS_DENIED, MODIFY_DENIED, TaskError, TaskResult};
use crate::models::{AddTaskRequest, NewTask, Task};
use crate::policy::TaskPolicy;
use crate::repository::{TaskRepository, TaskStore};

/// Service layer for Task business logic
pub struct TaskService<S: TaskStore> {
    store: Arc<S>,
    policy: TaskPolicy,
}

impl<S: TaskStore> Clone for TaskService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
        }
    }
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, TaskPolicy::default())
    }

    pub fn with_policy(store: S, policy: TaskPolicy) -> Self {
        Self {
            store: Arc::new(store),
            policy,
        }
    }

    pub fn policy(&self) -> &TaskPolicy {
        &self.policy
    }

    /// Create a task for `owner`
    ///
    /// The name is trimmed, then checked for emptiness, minimum length and
    /// uniqueness among the owner's tasks, in that order.
    #[instrument(skip(self, request, owner), fields(owner_id = %owner.id))]
    pub async fn add_one(&self, request: AddTaskRequest, owner: &User) -> TaskResult<Task> {
        let name = self.validate_name(&request.name)?;

        let unit = self.store.begin().await?;
        let result = insert_unique(
            &unit,
            NewTask {
                owner_id: owner.id,
                name,
                deadline: request.deadline,
            },
        )
        .await;
        let task = finish_unit(unit, result).await?;

        tracing::info!(task_id = task.id, "Task added");
        Ok(task)
    }

    /// All tasks of `owner_id` in creation order
    #[instrument(skip(self))]
    pub async fn home(&self, owner_id: Uuid) -> TaskResult<Vec<Task>> {
        let unit = self.store.begin().await?;
        let tasks = unit.find_all_by_owner(owner_id).await;
        finish_unit(unit, tasks).await
    }

    /// Permanently remove a task owned by `requester`
    #[instrument(skip(self, requester), fields(requester_id = %requester.id))]
    pub async fn delete(&self, task_id: i64, requester: &User) -> TaskResult<()> {
        let unit = self.store.begin().await?;
        let result = delete_owned(&unit, task_id, requester).await;
        finish_unit(unit, result).await?;

        tracing::info!("Task deleted");
        Ok(())
    }

    /// Fetch a single task owned by `requester`
    #[instrument(skip(self, requester), fields(requester_id = %requester.id))]
    pub async fn detail(&self, task_id: i64, requester: &User) -> TaskResult<Task> {
        let unit = self.store.begin().await?;
        let denied = TaskError::AccessDenied(ACCESS_DENIED);
        let result = owned_task(&unit, task_id, requester, denied).await;
        finish_unit(unit, result).await
    }

    /// Mark a task owned by `requester` as done or not done
    #[instrument(skip(self, requester), fields(requester_id = %requester.id))]
    pub async fn set_completed(
        &self,
        task_id: i64,
        requester: &User,
        completed: bool,
    ) -> TaskResult<Task> {
        let unit = self.store.begin().await?;
        let result = complete_owned(&unit, task_id, requester, completed).await;
        finish_unit(unit, result).await
    }

    fn validate_name(&self, raw: &str) -> TaskResult<String> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(TaskError::Empty);
        }

        if name.chars().count() < self.policy.min_name_len {
            return Err(TaskError::TooShort {
                min: self.policy.min_name_len,
            });
        }

        Ok(name.to_string())
    }
}

async fn insert_unique<R: TaskRepository>(repo: &R, task: NewTask) -> TaskResult<Task> {
    if repo
        .exists_by_owner_and_name(task.owner_id, &task.name)
        .await?
    {
        return Err(TaskError::Existing(task.name));
    }

    repo.save(task).await
}

async fn delete_owned<R: TaskRepository>(
    repo: &R,
    task_id: i64,
    requester: &User,
) -> TaskResult<()> {
    let task = owned_task(repo, task_id, requester, TaskError::PermissionDenied).await?;
    repo.delete(&task).await
}

async fn complete_owned<R: TaskRepository>(
    repo: &R,
    task_id: i64,
    requester: &User,
    completed: bool,
) -> TaskResult<Task> {
    let denied = TaskError::AccessDenied(MODIFY_DENIED);
    let task = owned_task(repo, task_id, requester, denied).await?;
    repo.update_completed(task.id, completed).await
}

/// Load a task and check that `requester` owns it; `denied` is returned otherwise
async fn owned_task<R: TaskRepository>(
    repo: &R,
    task_id: i64,
    requester: &User,
    denied: TaskError,
) -> TaskResult<Task> {
    let task = repo
        .find_by_id(task_id)
        .await?
        .ok_or(TaskError::TaskNotFound)?;

    if !task.is_owned_by(requester.id) {
        tracing::warn!(task_id, owner_id = %task.owner_id, "Ownership check failed");
        return Err(denied);
    }

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repository::InMemoryTaskStore;
    use chrono::{Duration, Utc};

    fn user(name: &str) -> User {
        User::new(name.to_string(), "$argon2id$stub".to_string())
    }

    fn request(name: &str) -> AddTaskRequest {
        AddTaskRequest::new(name, Utc::now() + Duration::hours(1))
    }

    fn service() -> (TaskService<InMemoryTaskStore>, InMemoryTaskStore) {
        let store = InMemoryTaskStore::new();
        (TaskService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_add_one_trims_name() {
        let (service, _) = service();
        let alice = user("alice");

        let task = service.add_one(request("  ab  "), &alice).await.unwrap();

        assert_eq!(task.name, "ab");
        assert_eq!(task.owner_id, alice.id);
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn test_whitespace_only_is_empty() {
        let (service, store) = service();

        let result = service.add_one(request(" \t\n "), &user("alice")).await;

        assert!(matches!(result, Err(TaskError::Empty)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_too_short_counts_characters() {
        let (service, _) = service();
        let alice = user("alice");

        let result = service.add_one(request("é"), &alice).await;
        assert!(matches!(result, Err(TaskError::TooShort { min: 2 })));

        assert!(service.add_one(request("éé"), &alice).await.is_ok());
    }

    #[tokio::test]
    async fn test_trimmed_duplicate_is_existing() {
        let (service, _) = service();
        let alice = user("alice");

        service.add_one(request("laundry"), &alice).await.unwrap();
        let result = service.add_one(request("  laundry "), &alice).await;

        assert!(matches!(result, Err(TaskError::Existing(name)) if name == "laundry"));
        assert_eq!(service.home(alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_check_is_case_sensitive() {
        let (service, _) = service();
        let alice = user("alice");

        service.add_one(request("laundry"), &alice).await.unwrap();
        service.add_one(request("Laundry"), &alice).await.unwrap();

        assert_eq!(service.home(alice.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_past_deadline_accepted() {
        let (service, _) = service();
        let overdue = AddTaskRequest::new("overdue", Utc::now() - Duration::days(3));

        let task = service.add_one(overdue, &user("alice")).await.unwrap();
        assert!(task.deadline < Utc::now());
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let service = TaskService::with_policy(InMemoryTaskStore::new(), TaskPolicy { min_name_len: 4 });

        let result = service.add_one(request("abc"), &user("alice")).await;
        assert!(matches!(result, Err(TaskError::TooShort { min: 4 })));
    }

    #[tokio::test]
    async fn test_home_is_in_creation_order() {
        let (service, _) = service();
        let alice = user("alice");

        for name in ["zeta", "alpha", "mu"] {
            service.add_one(request(name), &alice).await.unwrap();
        }

        let names: Vec<_> = service
            .home(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mu"]);
    }

    #[tokio::test]
    async fn test_detail_checks_owner() {
        let (service, _) = service();
        let (alice, bob) = (user("alice"), user("bob"));
        let task = service.add_one(request("secret"), &alice).await.unwrap();

        assert_eq!(service.detail(task.id, &alice).await.unwrap(), task);

        let err = service.detail(task.id, &bob).await.unwrap_err();
        assert_eq!(err.to_string(), "You do not have permission to access this task");

        let err = service.detail(task.id + 100, &alice).await.unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
    }

    #[tokio::test]
    async fn test_set_completed() {
        let (service, _) = service();
        let (alice, bob) = (user("alice"), user("bob"));
        let task = service.add_one(request("report"), &alice).await.unwrap();

        let done = service.set_completed(task.id, &alice, true).await.unwrap();
        assert!(done.completed);
        assert_eq!(done.name, "report");

        let err = service.set_completed(task.id, &bob, false).await.unwrap_err();
        assert_eq!(err.to_string(), "You do not have permission to modify this task");
        assert!(service.detail(task.id, &alice).await.unwrap().completed);

        let undone = service.set_completed(task.id, &alice, false).await.unwrap();
        assert!(!undone.completed);
    }

    #[tokio::test]
    async fn test_unknown_id_is_task_not_found() {
        let (service, store) = service();
        let alice = user("alice");
        service.add_one(request("existing"), &alice).await.unwrap();

        let err = service.detail(999, &alice).await.unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Task not found");

        let err = service.set_completed(999, &alice, true).await.unwrap_err();
        assert!(matches!(err, TaskError::TaskNotFound));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Task not found");

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_store_unchanged() {
        let (service, store) = service();
        let (alice, bob) = (user("alice"), user("bob"));
        let task = service.add_one(request("keep me"), &alice).await.unwrap();

        assert!(service.delete(task.id, &bob).await.is_err());

        assert_eq!(store.len().await, 1);
        assert_eq!(service.detail(task.id, &alice).await.unwrap(), task);
    }
}
