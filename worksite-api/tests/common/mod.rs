//! Common test utilities for integration tests
//!
//! Provides a test context wrapping a real database connection plus the
//! router, seed helpers for users and projects, and a small request helper
//! so individual tests stay readable.
//!
//! All integration tests need a running PostgreSQL reachable via
//! `DATABASE_URL` and are marked `#[ignore]` for that reason:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/worksite_test cargo test -- --ignored
//! ```

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use tower::Service as _;
use worksite_api::app::{build_router, AppState};
use worksite_api::config::Config;
use worksite_shared::auth::password::hash_password;
use worksite_shared::models::project::{CreateProject, Project};
use worksite_shared::models::user::{CreateUser, User};

/// Password used for all seeded users
pub const TEST_PASSWORD: &str = "Sup3rSecret!";

static EMAIL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Test context containing the database pool and the router under test
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to the worksite-api crate root
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a request through the router and returns status plus parsed body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::from(json.to_string())).unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }

    /// Removes a seeded user and everything hanging off their projects
    ///
    /// Children first: the schema uses RESTRICT foreign keys.
    pub async fn cleanup_user(&self, user_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            "DELETE FROM tasks WHERE user_id = $1 \
             OR project_id IN (SELECT id FROM projects WHERE owner_id = $1)",
        )
        .bind(user_id)
        .execute(&self.db)
        .await?;

        sqlx::query(
            "DELETE FROM documents WHERE project_id IN \
             (SELECT id FROM projects WHERE owner_id = $1)",
        )
        .bind(user_id)
        .execute(&self.db)
        .await?;

        sqlx::query(
            "DELETE FROM payments WHERE project_id IN \
             (SELECT id FROM projects WHERE owner_id = $1)",
        )
        .bind(user_id)
        .execute(&self.db)
        .await?;

        sqlx::query("DELETE FROM projects WHERE owner_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Generates an email that cannot collide across test runs
pub fn unique_email(prefix: &str) -> String {
    let n = EMAIL_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{}-{}-{}@example.com", prefix, nanos, n)
}

/// Seeds a user with a real Argon2id hash of [`TEST_PASSWORD`]
pub async fn create_test_user(ctx: &TestContext, prefix: &str) -> anyhow::Result<User> {
    let user = User::create(
        &ctx.db,
        CreateUser {
            name: format!("{} user", prefix),
            email: unique_email(prefix),
            password_hash: hash_password(TEST_PASSWORD)?,
        },
    )
    .await?;

    Ok(user)
}

/// Seeds a bare project owned by the given user
pub async fn create_test_project(
    ctx: &TestContext,
    owner_id: i64,
    name: &str,
) -> anyhow::Result<Project> {
    let project = Project::create(
        &ctx.db,
        CreateProject {
            name: name.to_string(),
            description: None,
            budget: None,
            start_date: None,
            end_date: None,
            owner_id,
        },
    )
    .await?;

    Ok(project)
}
