//! Request validation helpers shared by the route handlers
//!
//! Three concerns live here:
//!
//! - unwrapping JSON bodies so malformed payloads answer 400 instead of
//!   axum's default rejection
//! - running `validator` derives and flattening the result into the API's
//!   `{field, message}` detail list
//! - parsing client-supplied ISO-8601 date strings

use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use validator::Validate;

use crate::error::{ApiError, ValidationErrorDetail};

/// Unwraps an extracted JSON body, turning any rejection into a 400
///
/// Handlers take `Result<Json<T>, JsonRejection>` so a syntactically or
/// structurally invalid body reaches us instead of short-circuiting with
/// axum's own status choice.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::BadRequest(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    }
}

/// Runs derive-based validation and maps failures to the API detail format
pub fn check<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate().map_err(|e| {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::Validation(errors)
    })
}

/// Parses an ISO-8601 date string from client input
///
/// Accepts RFC 3339 timestamps ("2024-01-01T09:00:00Z") and bare dates
/// ("2024-01-01", interpreted as midnight UTC). Anything else is a 400
/// naming the offending field.
pub fn parse_date(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    Err(ApiError::BadRequest(format!("Invalid {} format", field)))
}

/// Parses an optional date field, passing None through
pub fn parse_date_opt(
    field: &str,
    value: Option<&String>,
) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value {
        Some(raw) => Ok(Some(parse_date(field, raw)?)),
        None => Ok(None),
    }
}
