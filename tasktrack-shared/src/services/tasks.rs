/// Owner-scoped task operations
///
/// Every method takes the authenticated user's id. Tasks owned by anyone else
/// come back as [`TaskServiceError::NotFound`], same as ids that never existed.

use std::sync::Arc;
use tracing::{debug, info};

use crate::models::task::{InvalidStatus, NewTask, Task, TaskStatus};
use crate::repository::{StoreError, TaskRepository};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    #[error("Task not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Task CRUD for one user at a time
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    /// Creates a pending task
    ///
    /// # Errors
    ///
    /// `Validation` if title or description is empty.
    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Task, TaskServiceError> {
        if title.is_empty() {
            return Err(TaskServiceError::Validation("Title is required".to_string()));
        }
        if description.is_empty() {
            return Err(TaskServiceError::Validation(
                "Description is required".to_string(),
            ));
        }

        let task = self
            .tasks
            .create_task(NewTask {
                user_id,
                title: title.to_owned(),
                description: description.to_owned(),
            })
            .await?;

        info!(user_id, task_id = task.id, "Task created");
        Ok(task)
    }

    /// All of the user's tasks, oldest first
    pub async fn list(&self, user_id: i64) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = self.tasks.list_for_user(user_id).await?;
        debug!(user_id, count = tasks.len(), "Tasks listed");
        Ok(tasks)
    }

    pub async fn get(&self, user_id: i64, task_id: i64) -> Result<Task, TaskServiceError> {
        self.tasks
            .find_by_id_for_user(user_id, task_id)
            .await?
            .ok_or(TaskServiceError::NotFound)
    }

    /// Sets the status of an owned task
    ///
    /// `status` is the raw wire value. Anything other than `pending` or
    /// `completed` is rejected before the store is touched.
    pub async fn update_status(
        &self,
        user_id: i64,
        task_id: i64,
        status: &str,
    ) -> Result<Task, TaskServiceError> {
        let status: TaskStatus = status
            .parse()
            .map_err(|e: InvalidStatus| TaskServiceError::Validation(e.to_string()))?;

        let task = self
            .tasks
            .update_status_for_user(user_id, task_id, status)
            .await?
            .ok_or(TaskServiceError::NotFound)?;

        info!(user_id, task_id, status = %task.status, "Task status updated");
        Ok(task)
    }

    /// Deletes an owned task; false if there was nothing to delete
    pub async fn delete(&self, user_id: i64, task_id: i64) -> Result<bool, TaskServiceError> {
        let deleted = self.tasks.delete_for_user(user_id, task_id).await?;

        if deleted {
            info!(user_id, task_id, "Task deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::NewUser;
    use crate::repository::test_support::memory_store;
    use crate::repository::UserRepository;
    use chrono::Utc;

    async fn setup() -> (TaskService, i64, i64) {
        let store = memory_store().await;
        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let user = store
                .create_user(NewUser {
                    username: name.to_string(),
                    password_hash: "x".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }

        (TaskService::new(Arc::new(store)), ids[0], ids[1])
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (service, alice, _) = setup().await;

        let task = service.create(alice, "buy milk", "2 litres").await.unwrap();
        let fetched = service.get(alice, task.id).await.unwrap();

        assert_eq!(fetched.status, TaskStatus::Pending);
        assert_eq!(fetched.title, "buy milk");
        assert_eq!(fetched.description, "2 litres");
        assert!(fetched.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let (service, alice, _) = setup().await;

        assert!(matches!(
            service.create(alice, "", "d").await,
            Err(TaskServiceError::Validation(_))
        ));
        assert!(matches!(
            service.create(alice, "t", "").await,
            Err(TaskServiceError::Validation(_))
        ));
        assert!(service.list(alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_users_tasks_are_not_found() {
        let (service, alice, bob) = setup().await;
        let task = service.create(alice, "private", "alice only").await.unwrap();

        assert!(service.list(bob).await.unwrap().is_empty());
        assert!(matches!(
            service.get(bob, task.id).await,
            Err(TaskServiceError::NotFound)
        ));
        assert!(matches!(
            service.update_status(bob, task.id, "completed").await,
            Err(TaskServiceError::NotFound)
        ));
        assert!(!service.delete(bob, task.id).await.unwrap());

        let untouched = service.get(alice, task.id).await.unwrap();
        assert_eq!(untouched.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_status_leaves_task_unchanged() {
        let (service, alice, _) = setup().await;
        let task = service.create(alice, "t", "d").await.unwrap();

        let result = service.update_status(alice, task.id, "archived").await;
        assert!(matches!(result, Err(TaskServiceError::Validation(_))));

        assert_eq!(service.get(alice, task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_status_round_trip() {
        let (service, alice, _) = setup().await;
        let task = service.create(alice, "t", "d").await.unwrap();

        let done = service.update_status(alice, task.id, "completed").await.unwrap();
        assert_eq!(done.status, TaskStatus::Completed);

        let reopened = service.update_status(alice, task.id, "pending").await.unwrap();
        assert_eq!(reopened.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (service, alice, _) = setup().await;
        let task = service.create(alice, "t", "d").await.unwrap();

        assert!(service.delete(alice, task.id).await.unwrap());
        assert!(!service.delete(alice, task.id).await.unwrap());
        assert!(matches!(
            service.get(alice, task.id).await,
            Err(TaskServiceError::NotFound)
        ));
    }
}
