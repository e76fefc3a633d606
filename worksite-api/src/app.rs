//! Application state and router builder
//!
//! Defines the shared application state and builds the axum router with all
//! routes and middleware. The state carries the connection pool constructed
//! by the entrypoint; nothing here is global.
//!
//! # Router layout
//!
//! ```text
//! /
//! ├── GET  /                        # Static liveness text
//! ├── GET  /health                  # Database connectivity check
//! └── /api/
//!     ├── POST /auth/login
//!     ├── /users                    # CRUD
//!     ├── /projects                 # CRUD + nested child creation
//!     │   ├── POST /:id/tasks
//!     │   ├── POST /:id/documents
//!     │   └── POST /:id/payments
//!     ├── /tasks                    # CRUD
//!     ├── /documents                # CRUD
//!     └── /payments                 # CRUD
//! ```
//!
//! Unmatched routes fall through to a JSON 404.

use crate::config::Config;
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into each request handler via axum's `State` extractor; `Arc`
/// keeps the clone cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new().route("/login", post(routes::auth::login));

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/:id/tasks", post(routes::projects::create_project_task))
        .route(
            "/:id/documents",
            post(routes::projects::create_project_document),
        )
        .route(
            "/:id/payments",
            post(routes::projects::create_project_payment),
        );

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let document_routes = Router::new()
        .route(
            "/",
            get(routes::documents::list_documents).post(routes::documents::create_document),
        )
        .route(
            "/:id",
            get(routes::documents::get_document)
                .put(routes::documents::update_document)
                .delete(routes::documents::delete_document),
        );

    let payment_routes = Router::new()
        .route(
            "/",
            get(routes::payments::list_payments).post(routes::payments::create_payment),
        )
        .route(
            "/:id",
            get(routes::payments::get_payment)
                .put(routes::payments::update_payment)
                .delete(routes::payments::delete_payment),
        );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/documents", document_routes)
        .nest("/payments", payment_routes);

    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Fallback handler for unmatched routes
async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": "Route not found"
        })),
    )
}
