//! API route handlers, one module per resource
//!
//! - `health`: liveness and database connectivity
//! - `auth`: login
//! - `users`: user accounts
//! - `projects`: projects plus nested child creation
//! - `tasks`, `documents`, `payments`: project children

use serde::Serialize;

pub mod auth;
pub mod documents;
pub mod health;
pub mod payments;
pub mod projects;
pub mod tasks;
pub mod users;

/// Response body for successful deletes
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}
