//! Document endpoints
//!
//! # Endpoints
//!
//! - `POST   /api/documents`
//! - `GET    /api/documents`
//! - `GET    /api/documents/:id`
//! - `PUT    /api/documents/:id`
//! - `DELETE /api/documents/:id`
//!
//! `POST /api/projects/:id/documents` funnels into the same insert logic.

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
    document::{CreateDocument, Document, DocumentWithProject, UpdateDocument},
    project::Project,
};

use super::DeletedResponse;

/// Create document request
///
/// `projectId` stays optional here because the nested creation route
/// supplies it from the path instead of the body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[validate(
        required(message = "title is required"),
        length(min = 1, message = "title must not be empty")
    )]
    pub title: Option<String>,

    #[validate(required(message = "text is required"))]
    pub text: Option<String>,

    pub project_id: Option<i64>,
}

/// Update document request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,

    pub text: Option<String>,
}

/// Create a new document
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or the referenced project does
///   not exist
pub async fn create_document(
    State(state): State<AppState>,
    payload: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Document>)> {
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

    let document = insert_document(&state, req, project_id).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// Persists the document; the caller has confirmed the project exists
pub(crate) async fn insert_document(
    state: &AppState,
    req: CreateDocumentRequest,
    project_id: i64,
) -> Result<Document, ApiError> {
    let document = Document::create(
        &state.db,
        CreateDocument {
            title: req.title.unwrap_or_default(),
            text: req.text.unwrap_or_default(),
            project_id,
        },
    )
    .await?;

    Ok(document)
}

/// List all documents with their parent project
pub async fn list_documents(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DocumentWithProject>>> {
    let documents = Document::list_with_project(&state.db).await?;
    Ok(Json(documents))
}

/// Get a single document by ID with its parent project
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DocumentWithProject>> {
    let document = Document::find_by_id_with_project(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    Ok(Json(document))
}

/// Update a document
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateDocumentRequest>, JsonRejection>,
) -> ApiResult<Json<Document>> {
    let req = validate::body(payload)?;
    validate::check(&req)?;

    let document = Document::update(
        &state.db,
        id,
        UpdateDocument {
            title: req.title,
            text: req.text,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    Ok(Json(document))
}

/// Delete a document
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = Document::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Document not found".to_string()));
    }

    Ok(Json(DeletedResponse {
        message: "Document deleted successfully".to_string(),
    }))
}
