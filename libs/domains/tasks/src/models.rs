use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Store-assigned; increases with creation order
    pub id: i64,
    /// Never changes after creation
    pub owner_id: Uuid,
    /// Trimmed, unique per owner
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// A validated task that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub owner_id: Uuid,
    pub name: String,
    pub deadline: DateTime<Utc>,
}

/// Payload for `TaskService::add_one`
#[derive(Debug, Clone, Deserialize)]
pub struct AddTaskRequest {
    pub name: String,
    pub deadline: DateTime<Utc>,
}

impl AddTaskRequest {
    pub fn new(name: impl Into<String>, deadline: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            deadline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_task_request_from_json() {
        let request: AddTaskRequest = serde_json::from_str(
            r#"{"name":"Tâche 1","deadline":"2026-10-19T12:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(request.name, "Tâche 1");
        assert_eq!(request.deadline.to_rfc3339(), "2026-10-19T12:00:00+00:00");
    }

    #[test]
    fn test_is_owned_by() {
        let owner = Uuid::now_v7();
        let task = Task {
            id: 1,
            owner_id: owner,
            name: "laundry".to_string(),
            deadline: Utc::now(),
            completed: false,
            created_at: Utc::now(),
        };

        assert!(task.is_owned_by(owner));
        assert!(!task.is_owned_by(Uuid::now_v7()));
    }
}
