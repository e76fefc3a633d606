//! User endpoints
//!
//! Standard CRUD for user accounts. Passwords are hashed with Argon2id
//! before they ever reach the model layer; responses never carry the hash.
//!
//! # Endpoints
//!
//! - `POST   /api/users`
//! - `GET    /api/users`
//! - `GET    /api/users/:id`
//! - `PUT    /api/users/:id`
//! - `DELETE /api/users/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    validate,
};
use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;
use worksite_shared::{
    auth::password,
    models::user::{CreateUser, UpdateUser, User},
};

use super::DeletedResponse;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "email is required"),
        email(message = "Invalid email format")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "password is required"),
        length(min = 8, message = "Password must be at least 8 characters")
    )]
    pub password: Option<String>,
}

/// Update user request
///
/// All fields optional; only supplied fields are written.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Create a new user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    let password_hash = password::hash_password(&req.password.unwrap_or_default())?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password_hash,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = User::list(&state.db).await?;
    Ok(Json(users))
}

/// Get a single user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Update a user
///
/// A supplied password is re-hashed before storage.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    let password_hash = match req.password {
        Some(ref plaintext) => Some(password::hash_password(plaintext)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Delete a user
///
/// # Errors
///
/// - `404 Not Found`: No such user
/// - `409 Conflict`: User still owns projects or is assigned to tasks
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(DeletedResponse {
        message: "User deleted successfully".to_string(),
    }))
}
