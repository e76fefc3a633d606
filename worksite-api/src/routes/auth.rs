//! Authentication endpoints
//!
//! # Endpoints
//!
//! - `POST /api/auth/login` - Verify credentials and return the account

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    validate,
};
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;
use worksite_shared::{auth::password, models::user::User};

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(
        required(message = "email is required"),
        email(message = "Invalid email format")
    )]
    pub email: Option<String>,

    /// Password
    #[validate(required(message = "password is required"))]
    pub password: Option<String>,
}

/// Login response
///
/// The embedded user never carries the password hash; the model excludes it
/// from serialization.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

/// Login endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Wrong password
/// - `404 Not Found`: No account with that email
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user,
    }))
}
