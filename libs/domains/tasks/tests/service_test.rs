//! End-to-end tests wiring the account and task services over in-memory stores

use chrono::{Duration, Utc};
use domain_accounts::{AccountService, Argon2Hasher, InMemoryUserStore, SignupRequest, User};
use domain_tasks::*;

struct App {
    accounts: AccountService<InMemoryUserStore, Argon2Hasher>,
    tasks: TaskService<InMemoryTaskStore>,
}

impl App {
    fn new() -> Self {
        let hasher = Argon2Hasher::with_params(1024, 1, 1).unwrap();
        Self {
            accounts: AccountService::new(InMemoryUserStore::new(), hasher),
            tasks: TaskService::new(InMemoryTaskStore::new()),
        }
    }

    async fn signup(&self, username: &str) -> User {
        self.accounts
            .signup(SignupRequest::new(username, "Passw0rd!"))
            .await
            .unwrap()
    }
}

fn in_one_hour(name: &str) -> AddTaskRequest {
    AddTaskRequest::new(name, Utc::now() + Duration::seconds(3600))
}

#[tokio::test]
async fn test_add_task_for_new_user() {
    let app = App::new();
    app.signup("alice").await;

    let alice = app.accounts.resolve_by_username("alice").await.unwrap();
    app.tasks
        .add_one(in_one_hour("Tâche 1"), &alice)
        .await
        .unwrap();

    let home = app.tasks.home(alice.id).await.unwrap();
    assert_eq!(home.len(), 1);
    assert_eq!(home[0].name, "Tâche 1");
}

#[tokio::test]
async fn test_add_empty_name() {
    let app = App::new();
    let alice = app.signup("alice").await;

    let err = app.tasks.add_one(in_one_hour(""), &alice).await.unwrap_err();

    assert!(matches!(err, TaskError::Empty));
    assert_eq!(app.tasks.home(alice.id).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_add_too_short() {
    let app = App::new();
    let alice = app.signup("alice").await;

    let err = app.tasks.add_one(in_one_hour("t"), &alice).await.unwrap_err();

    assert!(matches!(err, TaskError::TooShort { .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(app.tasks.home(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_existing() {
    let app = App::new();
    let alice = app.signup("alice").await;

    app.tasks
        .add_one(in_one_hour("Bonne tâche"), &alice)
        .await
        .unwrap();
    let err = app
        .tasks
        .add_one(in_one_hour("Bonne tâche"), &alice)
        .await
        .unwrap_err();

    assert!(matches!(err, TaskError::Existing(_)));
    assert_eq!(app.tasks.home(alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_same_name_for_different_users() {
    let app = App::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    app.tasks.add_one(in_one_hour("Courses"), &alice).await.unwrap();
    app.tasks.add_one(in_one_hour("Courses"), &bob).await.unwrap();

    assert_eq!(app.tasks.home(alice.id).await.unwrap().len(), 1);
    assert_eq!(app.tasks.home(bob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_own_task() {
    let app = App::new();
    let alice = app.signup("alice").await;

    let task = app
        .tasks
        .add_one(in_one_hour("Tâche à supprimer"), &alice)
        .await
        .unwrap();
    assert_eq!(app.tasks.home(alice.id).await.unwrap().len(), 1);

    app.tasks.delete(task.id, &alice).await.unwrap();
    assert_eq!(app.tasks.home(alice.id).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_unknown_id() {
    let app = App::new();
    let alice = app.signup("alice").await;

    let err = app.tasks.delete(999, &alice).await.unwrap_err();

    assert!(matches!(err, TaskError::TaskNotFound));
    assert_eq!(err.to_string(), "Task not found");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_delete_someone_elses_task() {
    let app = App::new();
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let task = app
        .tasks
        .add_one(in_one_hour("Tâche d'Alice"), &alice)
        .await
        .unwrap();

    let err = app.tasks.delete(task.id, &bob).await.unwrap_err();

    assert!(matches!(err, TaskError::PermissionDenied));
    assert_eq!(
        err.to_string(),
        "You do not have permission to delete this task"
    );
    assert_eq!(err.kind(), ErrorKind::Security);
    assert_eq!(app.tasks.home(alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleted_task_is_gone_for_good() {
    let app = App::new();
    let alice = app.signup("alice").await;

    let task = app.tasks.add_one(in_one_hour("once"), &alice).await.unwrap();
    app.tasks.delete(task.id, &alice).await.unwrap();

    assert!(matches!(
        app.tasks.delete(task.id, &alice).await,
        Err(TaskError::TaskNotFound)
    ));
    assert!(matches!(
        app.tasks.detail(task.id, &alice).await,
        Err(TaskError::TaskNotFound)
    ));

    // The name is free again
    let again = app.tasks.add_one(in_one_hour("once"), &alice).await.unwrap();
    assert!(again.id > task.id);
}

#[tokio::test]
async fn test_concurrent_adds_with_same_name() {
    let app = App::new();
    let alice = app.signup("alice").await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tasks = app.tasks.clone();
            let alice = alice.clone();
            tokio::spawn(async move { tasks.add_one(in_one_hour("race"), &alice).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(matches!(e, TaskError::Existing(_))),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(app.tasks.home(alice.id).await.unwrap().len(), 1);
}
