//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, course_routes, department_routes, enrollment_routes, file_handler, file_routes,
    portal_routes, student_routes, subject_routes, teacher_routes,
};
use super::middleware::access_guard;
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::MAX_UPLOAD_BYTES;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // JSON API under /api. The access guard's path matcher does not cover
    // this tree; each handler requires the session through the CurrentUser
    // extractor instead (login excepted).
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/departments", department_routes())
        .nest("/courses", course_routes())
        .nest("/subjects", subject_routes())
        .nest("/teachers", teacher_routes())
        .nest("/students", student_routes())
        .nest("/enrollments", enrollment_routes())
        .nest("/files", file_routes())
        .route(
            "/upload",
            post(file_handler::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        );

    Router::new()
        // Health check endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        // Role portals, gated by the access guard below
        .merge(portal_routes())
        .layer(middleware::from_fn_with_state(state.clone(), access_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Campus API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        Some(db) => match db.ping().await {
            Ok(_) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        },
        None => ServiceStatus {
            status: "not configured",
            error: None,
        },
    };

    let healthy = database.status == "healthy";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        database,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
