//! Tasks Domain
//!
//! Per-user task lists: creation with name validation, listing, completion
//! and ownership-checked deletion.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Name rules, ownership checks
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
//! use domain_tasks::{AddTaskRequest, PgTaskStore, TaskService};
//! use sea_orm::Database;
//!
//! # async fn example(owner: domain_accounts::User) -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//! let service = TaskService::new(PgTaskStore::new(db));
//!
//! let deadline = chrono::Utc::now() + chrono::Duration::hours(1);
//! service.add_one(AddTaskRequest::new("Tâche 1", deadline), &owner).await?;
//! let tasks = service.home(owner.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod policy;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ErrorKind, TaskError, TaskResult};
pub use models::{AddTaskRequest, NewTask, Task};
pub use policy::TaskPolicy;
pub use postgres::{PgTaskStore, PgTaskUnit};
pub use repository::{InMemoryTaskStore, TaskRepository, TaskStore};
pub use service::TaskService;
