/// Domain models for TaskTrack
///
/// Plain value types shared by the repositories, services and HTTP layer.
/// Persistence lives in [`crate::repository`]; nothing here talks to the
/// database.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `task`: Per-user tasks and their status
///
/// # Example
///
/// ```
/// use tasktrack_shared::models::task::TaskStatus;
///
/// let status: TaskStatus = "completed".parse().unwrap();
/// assert_eq!(status, TaskStatus::Completed);
/// assert_eq!(TaskStatus::default(), TaskStatus::Pending);
/// ```

pub mod task;
pub mod user;
