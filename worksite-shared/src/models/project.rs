//! Project model and database operations
//!
//! Projects are the root of the domain: tasks, documents, and payments all
//! hang off a project, and every project has an owning user.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE projects (
//!     id BIGSERIAL PRIMARY KEY,
//!     name VARCHAR(255) NOT NULL,
//!     description TEXT,
//!     budget DOUBLE PRECISION,
//!     start_date TIMESTAMPTZ,
//!     end_date TIMESTAMPTZ,
//!     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::document::Document;
use super::payment::Payment;
use super::task::Task;
use super::user::User;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Surrogate key
    pub id: i64,

    pub name: String,
    pub description: Option<String>,

    /// Budget in currency units; positive when present
    pub budget: Option<f64>,

    pub start_date: Option<DateTime<Utc>>,

    /// Never precedes `start_date` when both are set
    pub end_date: Option<DateTime<Utc>>,

    /// Owning user
    pub owner_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project together with its owner and child collections
///
/// Mirrors what `GET /api/projects` and `GET /api/projects/:id` return.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithRelations {
    #[serde(flatten)]
    pub project: Project,

    pub owner: User,
    pub tasks: Vec<Task>,
    pub documents: Vec<Document>,
    pub payments: Vec<Payment>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub owner_id: i64,
}

/// Input for updating an existing project
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Project {
    /// Creates a new project
    ///
    /// The caller is responsible for having checked that the owner exists;
    /// the foreign key is the final guard.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, budget, start_date, end_date, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, budget, start_date, end_date, owner_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.budget)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID, without relations
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, budget, start_date, end_date, owner_id,
                   created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Checks whether a project with the given ID exists
    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Lists all projects joined with owner, tasks, documents, and payments
    ///
    /// Children are loaded in one query per collection and grouped in
    /// memory, rather than one round-trip per project.
    pub async fn list_with_relations(pool: &PgPool) -> Result<Vec<ProjectWithRelations>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, budget, start_date, end_date, owner_id,
                   created_at, updated_at
            FROM projects
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        if projects.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
        let owner_ids: Vec<i64> = projects.iter().map(|p| p.owner_id).collect();

        let owners = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(&owner_ids)
        .fetch_all(pool)
        .await?;
        let owners: HashMap<i64, User> = owners.into_iter().map(|u| (u.id, u)).collect();

        let mut tasks: HashMap<i64, Vec<Task>> = HashMap::new();
        for task in Task::list_by_project_ids(pool, &project_ids).await? {
            tasks.entry(task.project_id).or_default().push(task);
        }

        let mut documents: HashMap<i64, Vec<Document>> = HashMap::new();
        for document in Document::list_by_project_ids(pool, &project_ids).await? {
            documents.entry(document.project_id).or_default().push(document);
        }

        let mut payments: HashMap<i64, Vec<Payment>> = HashMap::new();
        for payment in Payment::list_by_project_ids(pool, &project_ids).await? {
            payments.entry(payment.project_id).or_default().push(payment);
        }

        let mut result = Vec::with_capacity(projects.len());
        for project in projects {
            let owner = owners
                .get(&project.owner_id)
                .cloned()
                .ok_or(sqlx::Error::RowNotFound)?;

            result.push(ProjectWithRelations {
                owner,
                tasks: tasks.remove(&project.id).unwrap_or_default(),
                documents: documents.remove(&project.id).unwrap_or_default(),
                payments: payments.remove(&project.id).unwrap_or_default(),
                project,
            });
        }

        Ok(result)
    }

    /// Finds one project by ID with the same joins as [`Self::list_with_relations`]
    pub async fn find_by_id_with_relations(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<ProjectWithRelations>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let owner = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(project.owner_id)
        .fetch_one(pool)
        .await?;

        let ids = [project.id];
        let tasks = Task::list_by_project_ids(pool, &ids).await?;
        let documents = Document::list_by_project_ids(pool, &ids).await?;
        let payments = Payment::list_by_project_ids(pool, &ids).await?;

        Ok(Some(ProjectWithRelations {
            project,
            owner,
            tasks,
            documents,
            payments,
        }))
    }

    /// Updates an existing project
    ///
    /// Only non-None fields in `data` are written; `updated_at` is always
    /// refreshed. Returns None if the project does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.budget.is_some() {
            bind_count += 1;
            query.push_str(&format!(", budget = ${}", bind_count));
        }
        if data.start_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", start_date = ${}", bind_count));
        }
        if data.end_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", end_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, description, budget, start_date, end_date, \
             owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(budget) = data.budget {
            q = q.bind(budget);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = data.end_date {
            q = q.bind(end_date);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project by ID
    ///
    /// Returns true if a row was removed. Fails with a foreign-key violation
    /// if tasks, documents, or payments still reference the project
    /// (ON DELETE RESTRICT).
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
