//! Document model and database operations
//!
//! Plain text documents attached to a project.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE documents (
//!     id BIGSERIAL PRIMARY KEY,
//!     title VARCHAR(255) NOT NULL,
//!     text TEXT NOT NULL,
//!     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE RESTRICT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::project::Project;

/// Document model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Surrogate key
    pub id: i64,

    pub title: String,

    /// Document body
    pub text: String,

    /// Parent project
    pub project_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document together with its parent project
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWithProject {
    #[serde(flatten)]
    pub document: Document,

    pub project: Project,
}

/// Input for creating a new document
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub title: String,
    pub text: String,
    pub project_id: i64,
}

/// Input for updating an existing document
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub text: Option<String>,
}

impl Document {
    /// Creates a new document
    pub async fn create(pool: &PgPool, data: CreateDocument) -> Result<Self, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (title, text, project_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, text, project_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.text)
        .bind(data.project_id)
        .fetch_one(pool)
        .await?;

        Ok(document)
    }

    /// Finds a document by ID, without relations
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, text, project_id, created_at, updated_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Finds a document by ID joined with its parent project
    pub async fn find_by_id_with_project(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<DocumentWithProject>, sqlx::Error> {
        let Some(document) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let project = Project::find_by_id(pool, document.project_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        Ok(Some(DocumentWithProject { document, project }))
    }

    /// Lists all documents joined with their parent project
    pub async fn list_with_project(pool: &PgPool) -> Result<Vec<DocumentWithProject>, sqlx::Error> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, text, project_id, created_at, updated_at
            FROM documents
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        let mut result = Vec::with_capacity(documents.len());
        for document in documents {
            let project = Project::find_by_id(pool, document.project_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            result.push(DocumentWithProject { document, project });
        }

        Ok(result)
    }

    /// Lists the documents belonging to any of the given projects
    pub async fn list_by_project_ids(
        pool: &PgPool,
        project_ids: &[i64],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, text, project_id, created_at, updated_at
            FROM documents
            WHERE project_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    /// Updates an existing document
    ///
    /// Returns None if the document does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateDocument,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE documents SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.text.is_some() {
            bind_count += 1;
            query.push_str(&format!(", text = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, text, project_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Document>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(text) = data.text {
            q = q.bind(text);
        }

        let document = q.fetch_optional(pool).await?;

        Ok(document)
    }

    /// Deletes a document by ID
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
