/// Business logic on top of the repositories
///
/// - [`auth`]: signup and login, issuing bearer tokens
/// - [`tasks`]: owner-scoped task CRUD

pub mod auth;
pub mod tasks;
