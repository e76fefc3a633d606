//! Project endpoints
//!
//! Projects carry the heaviest validation: owner existence, positive
//! budget, ISO-8601 dates, and endDate/startDate ordering. The nested
//! creation routes check the parent first and then reuse the child
//! resource's insert logic with the project taken from the path.
//!
//! # Endpoints
//!
//! - `POST   /api/projects`
//! - `GET    /api/projects`
//! - `GET    /api/projects/:id`
//! - `PUT    /api/projects/:id`
//! - `DELETE /api/projects/:id`
//! - `POST   /api/projects/:id/tasks`
//! - `POST   /api/projects/:id/documents`
//! - `POST   /api/projects/:id/payments`

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
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;
use worksite_shared::models::{
    document::Document,
    payment::Payment,
    project::{CreateProject, Project, ProjectWithRelations, UpdateProject},
    task::Task,
    user::User,
};

use super::documents::CreateDocumentRequest;
use super::DeletedResponse;
use super::payments::CreatePaymentRequest;
use super::tasks::CreateTaskRequest;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    /// Positive budget in currency units
    pub budget: Option<f64>,

    /// ISO-8601 start date
    pub start_date: Option<String>,

    /// ISO-8601 end date; must not precede the start date
    pub end_date: Option<String>,

    #[validate(required(message = "ownerId is required"))]
    pub owner_id: Option<i64>,
}

/// Update project request
///
/// All fields optional; only supplied fields are written. Date ordering is
/// re-checked against the merged record.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub budget: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn check_budget(budget: Option<f64>, errors: &mut Vec<ValidationErrorDetail>) {
    if let Some(budget) = budget {
        if budget <= 0.0 {
            errors.push(ValidationErrorDetail {
                field: "budget".to_string(),
                message: "budget must be a positive number".to_string(),
            });
        }
    }
}

fn check_date_order(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    errors: &mut Vec<ValidationErrorDetail>,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.push(ValidationErrorDetail {
                field: "endDate".to_string(),
                message: "endDate must not precede startDate".to_string(),
            });
        }
    }
}

/// Create a new project
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, invalid dates, endDate before
///   startDate, or the owner does not exist
pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    let start_date = validate::parse_date_opt("startDate", req.start_date.as_ref())?;
    let end_date = validate::parse_date_opt("endDate", req.end_date.as_ref())?;

    let mut errors = Vec::new();
    check_budget(req.budget, &mut errors);
    check_date_order(start_date, end_date, &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let owner_id = req.owner_id.unwrap_or_default();
    if !User::exists(&state.db, owner_id).await? {
        return Err(ApiError::BadRequest("Owner not found".to_string()));
    }

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name.unwrap_or_default(),
            description: req.description,
            budget: req.budget,
            start_date,
            end_date,
            owner_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// List all projects with owner, tasks, documents, and payments
pub async fn list_projects(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProjectWithRelations>>> {
    let projects = Project::list_with_relations(&state.db).await?;
    Ok(Json(projects))
}

/// Get a single project by ID with the same joins as the list
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectWithRelations>> {
    let project = Project::find_by_id_with_relations(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Update a project
///
/// Only the supplied fields are written. Date ordering is validated
/// against the merged record, so setting just `endDate` cannot slip it
/// before an existing `startDate`.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateProjectRequest>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    let existing = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let start_date = validate::parse_date_opt("startDate", req.start_date.as_ref())?;
    let end_date = validate::parse_date_opt("endDate", req.end_date.as_ref())?;

    let mut errors = Vec::new();
    check_budget(req.budget, &mut errors);
    check_date_order(
        start_date.or(existing.start_date),
        end_date.or(existing.end_date),
        &mut errors,
    );
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let project = Project::update(
        &state.db,
        id,
        UpdateProject {
            name: req.name,
            description: req.description,
            budget: req.budget,
            start_date,
            end_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Delete a project
///
/// # Errors
///
/// - `404 Not Found`: No such project
/// - `409 Conflict`: Tasks, documents, or payments still reference it
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = Project::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(Json(DeletedResponse {
        message: "Project deleted successfully".to_string(),
    }))
}

/// Create a task under a project
///
/// The parent is checked first (404 when absent); the body then goes
/// through the same validation and insert path as `POST /api/tasks`.
pub async fn create_project_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let req = validate::body(payload)?;

    if !Project::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    validate::check(&req)?;

    let task = super::tasks::insert_task(&state, req, id).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Create a document under a project
pub async fn create_project_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let req = validate::body(payload)?;

    if !Project::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    validate::check(&req)?;

    let document = super::documents::insert_document(&state, req, id).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Create a payment under a project
pub async fn create_project_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Payment>)> {
    let req = validate::body(payload)?;

    if !Project::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    validate::check(&req)?;

    let payment = super::payments::insert_payment(&state, req, id).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}
