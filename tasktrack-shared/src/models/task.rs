/// Task model
///
/// A task belongs to exactly one user. Only its status can change after
/// creation; everything else is fixed.
///
/// # State Machine
///
/// ```text
/// pending ⇄ completed
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     status TEXT NOT NULL DEFAULT 'pending'
///         CHECK (status IN ('pending', 'completed')),
///     created_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task status
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not done yet
    #[default]
    Pending,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Converts status to its stored/wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{0}': expected 'pending' or 'completed'")]
pub struct InvalidStatus(pub String);

impl FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Task owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// System-assigned task ID
    pub id: i64,

    /// Owner; never exposed on the wire
    #[serde(skip_serializing, default)]
    pub user_id: i64,

    /// Short title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created (UTC)
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Owning user
    pub user_id: i64,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("pending".parse::<TaskStatus>(), Ok(TaskStatus::Pending));
        assert_eq!("completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));

        let err = "done".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err, InvalidStatus("done".to_string()));

        // Case matters on the wire
        assert!("Completed".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");

        let parsed: TaskStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, TaskStatus::Pending);

        assert!(serde_json::from_str::<TaskStatus>("\"archived\"").is_err());
    }

    #[test]
    fn test_task_wire_shape_hides_owner() {
        let task = Task {
            id: 1,
            user_id: 42,
            title: "buy milk".to_string(),
            description: "2 litres".to_string(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "pending");
        assert!(json["created_at"].is_string());
        assert!(json.get("user_id").is_none());
    }
}
