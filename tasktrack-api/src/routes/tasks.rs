/// Task endpoints
///
/// Per-user task CRUD. Every route requires the `X-API-Key` header and a
/// bearer token; the session middleware supplies the [`AuthContext`] and
/// every operation is scoped to that user. Tasks belonging to someone else
/// are reported as `404 Task not found`.
///
/// # Endpoints
///
/// - `POST /tasks/` - Create a task
/// - `GET /tasks/` - List own tasks, oldest first
/// - `GET /tasks/:task_id` - Fetch one task
/// - `PUT /tasks/:task_id` - Update a task's status
/// - `DELETE /tasks/:task_id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{auth::session::AuthContext, models::task::Task};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    /// Task description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// Update task request
///
/// Only the status can change.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// `pending` or `completed`
    pub status: Option<String>,
}

/// Delete confirmation
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    pub detail: String,
}

/// Create a task for the authenticated user
///
/// # Endpoint
///
/// ```text
/// POST /tasks/
/// X-API-Key: <key>
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "buy milk",
///   "description": "2 litres"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": 1,
///   "title": "buy milk",
///   "description": "2 litres",
///   "status": "pending",
///   "created_at": "2024-01-01T12:00:00Z"
/// }
/// ```
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = state
        .tasks
        .create(auth.user_id, &req.title, &req.description)
        .await?;

    Ok(Json(task))
}

/// List the authenticated user's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.list(auth.user_id).await?))
}

/// Fetch a single owned task
///
/// # Errors
///
/// - `404 Not Found`: No such task, or it belongs to another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.get(auth.user_id, task_id).await?))
}

/// Update the status of an owned task
///
/// # Endpoint
///
/// ```text
/// PUT /tasks/1
///
/// { "status": "completed" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Status missing or not `pending`/`completed`
/// - `404 Not Found`: No such task, or it belongs to another user
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let status = req.status.ok_or_else(|| {
        ApiError::BadRequest("Status is required to update task status".to_string())
    })?;

    let task = state
        .tasks
        .update_status(auth.user_id, task_id, &status)
        .await?;

    Ok(Json(task))
}

/// Delete an owned task
///
/// # Errors
///
/// - `404 Not Found`: No such task, already deleted, or another user's
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    if !state.tasks.delete(auth.user_id, task_id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(DeleteTaskResponse {
        detail: "Task deleted".to_string(),
    }))
}
