//! Payment endpoints
//!
//! # Endpoints
//!
//! - `POST   /api/payments`
//! - `GET    /api/payments`
//! - `GET    /api/payments/:id`
//! - `PUT    /api/payments/:id`
//! - `DELETE /api/payments/:id`
//!
//! `POST /api/projects/:id/payments` funnels into the same insert logic.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
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
use worksite_shared::models::{
    payment::{CreatePayment, Payment, PaymentWithProject, UpdatePayment},
    project::Project,
};

use super::DeletedResponse;

/// Create payment request
///
/// `projectId` stays optional here because the nested creation route
/// supplies it from the path instead of the body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[validate(required(message = "amount is required"))]
    pub amount: Option<f64>,

    #[validate(
        required(message = "method is required"),
        length(min = 1, message = "method must not be empty")
    )]
    pub method: Option<String>,

    /// ISO-8601 payment date
    pub date: Option<String>,

    pub project_id: Option<i64>,
}

/// Update payment request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaymentRequest {
    pub amount: Option<f64>,

    #[validate(length(min = 1, message = "method must not be empty"))]
    pub method: Option<String>,
}

/// Create a new payment
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, non-positive amount, or the
///   referenced project does not exist
pub async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Payment>)> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    let project_id = req.project_id.ok_or_else(|| {
        ApiError::Validation(vec![ValidationErrorDetail {
            field: "projectId".to_string(),
            message: "projectId is required".to_string(),
        }])
    })?;

    if !Project::exists(&state.db, project_id).await? {
        return Err(ApiError::BadRequest("Project not found".to_string()));
    }

    let payment = insert_payment(&state, req, project_id).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Validates amount and date, then persists the payment
///
/// Shared by the top-level and nested creation routes; the caller has
/// already confirmed the project exists.
pub(crate) async fn insert_payment(
    state: &AppState,
    req: CreatePaymentRequest,
    project_id: i64,
) -> Result<Payment, ApiError> {
    let amount = req.amount.unwrap_or_default();
    if amount <= 0.0 {
        return Err(ApiError::Validation(vec![ValidationErrorDetail {
            field: "amount".to_string(),
            message: "amount must be a positive number".to_string(),
        }]));
    }

    let date = validate::parse_date_opt("date", req.date.as_ref())?;

    let payment = Payment::create(
        &state.db,
        CreatePayment {
            amount,
            method: req.method.unwrap_or_default(),
            date,
            project_id,
        },
    )
    .await?;

    Ok(payment)
}

/// List all payments with their parent project
pub async fn list_payments(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PaymentWithProject>>> {
    let payments = Payment::list_with_project(&state.db).await?;
    Ok(Json(payments))
}

/// Get a single payment by ID with its parent project
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PaymentWithProject>> {
    let payment = Payment::find_by_id_with_project(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    Ok(Json(payment))
}

/// Update a payment
///
/// A supplied amount is re-validated for positivity.
pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdatePaymentRequest>, JsonRejection>,
) -> ApiResult<Json<Payment>> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    if let Some(amount) = req.amount {
        if amount <= 0.0 {
            return Err(ApiError::Validation(vec![ValidationErrorDetail {
                field: "amount".to_string(),
                message: "amount must be a positive number".to_string(),
            }]));
        }
    }

    let payment = Payment::update(
        &state.db,
        id,
        UpdatePayment {
            amount: req.amount,
            method: req.method,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    Ok(Json(payment))
}

/// Delete a payment
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = Payment::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Payment not found".to_string()));
    }

    Ok(Json(DeletedResponse {
        message: "Payment deleted successfully".to_string(),
    }))
}
