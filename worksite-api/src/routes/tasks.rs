//! Task endpoints
//!
//! Tasks reference an assigned user and a parent project; both references
//! are checked before insert. Status is matched case-insensitively against
//! the closed set and defaults to "pending" on create (never on update).
//!
//! # Endpoints
//!
//! - `POST   /api/tasks`
//! - `GET    /api/tasks`
//! - `GET    /api/tasks/:id`
//! - `PUT    /api/tasks/:id`
//! - `DELETE /api/tasks/:id`
//!
//! `POST /api/projects/:id/tasks` funnels into the same insert logic with
//! the project taken from the path.

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
    project::Project,
    task::{CreateTask, Task, TaskStatus, TaskWithRelations, UpdateTask},
    user::User,
};

use super::DeletedResponse;

/// Create task request
///
/// `projectId` stays optional here because the nested creation route
/// supplies it from the path instead of the body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(
        required(message = "title is required"),
        length(min = 1, message = "title must not be empty")
    )]
    pub title: Option<String>,

    pub description: Option<String>,

    /// Status name, matched case-insensitively
    pub status: Option<String>,

    /// ISO-8601 due date
    pub due_date: Option<String>,

    #[validate(required(message = "userId is required"))]
    pub user_id: Option<i64>,

    pub project_id: Option<i64>,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,

    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// Create a new task
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, invalid status or dueDate, or
///   the referenced user/project does not exist
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
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

    let task = insert_task(&state, req, project_id).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Validates references and field formats, then persists the task
///
/// Shared by the top-level and nested creation routes; the caller has
/// already confirmed the project exists.
pub(crate) async fn insert_task(
    state: &AppState,
    req: CreateTaskRequest,
    project_id: i64,
) -> Result<Task, ApiError> {
    let user_id = req.user_id.unwrap_or_default();
    if !User::exists(&state.db, user_id).await? {
        return Err(ApiError::BadRequest("User not found".to_string()));
    }

    let status = match req.status {
        Some(ref raw) => TaskStatus::parse(raw)
            .ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?,
        None => TaskStatus::default(),
    };

    let due_date = validate::parse_date_opt("dueDate", req.due_date.as_ref())?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title.unwrap_or_default(),
            description: req.description,
            status,
            due_date,
            user_id,
            project_id,
        },
    )
    .await?;

    Ok(task)
}

/// List all tasks with their user and project
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskWithRelations>>> {
    let tasks = Task::list_with_relations(&state.db).await?;
    Ok(Json(tasks))
}

/// Get a single task by ID with its user and project
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskWithRelations>> {
    let task = Task::find_by_id_with_relations(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Update a task
///
/// Applies only the supplied fields with the same status and date rules as
/// create; an absent status stays untouched rather than defaulting.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    let status = match req.status {
        Some(ref raw) => Some(
            TaskStatus::parse(raw)
                .ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?,
        ),
        None => None,
    };

    let due_date = validate::parse_date_opt("dueDate", req.due_date.as_ref())?;

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status,
            due_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(DeletedResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
