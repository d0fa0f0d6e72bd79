use async_trait::async_trait;
use chrono::Utc;

use super::{SqliteStore, StoreResult, TaskRepository};
use crate::models::task::{NewTask, Task, TaskStatus};

const TASK_COLUMNS: &str = "id, user_id, title, description, status, created_at";

#[async_trait]
impl TaskRepository for SqliteStore {
    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (user_id, title, description, status, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(TaskStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Task>> {
        let mut tx = self.pool.begin().await?;

        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE user_id = ?
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(tasks)
    }

    async fn find_by_id_for_user(
        &self,
        user_id: i64,
        task_id: i64,
    ) -> StoreResult<Option<Task>> {
        let mut tx = self.pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND user_id = ?"
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn update_status_for_user(
        &self,
        user_id: i64,
        task_id: i64,
        status: TaskStatus,
    ) -> StoreResult<Option<Task>> {
        let mut tx = self.pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET status = ?
             WHERE id = ? AND user_id = ?
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(status)
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn delete_for_user(&self, user_id: i64, task_id: i64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
