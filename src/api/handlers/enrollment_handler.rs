//! Enrollment handlers.
//!
//! The POST surface is a reconcile: the submitted subject list replaces
//! the student's full enrollment set in one transaction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{require_admin, CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::domain::Enrollment;
use crate::errors::AppResult;

/// Enrollment reconcile request: the full new set for one student
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReconcileEnrollmentsRequest {
    /// Student user id
    pub student_id: Uuid,
    /// Complete set of subject ids the student should hold after the call.
    /// Duplicates collapse to one enrollment per subject.
    pub subject_ids: Vec<Uuid>,
}

/// Enrollment list filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct EnrollmentFilter {
    /// Narrow to one student (user id)
    pub student: Option<Uuid>,
    /// Narrow to one subject
    pub subject: Option<Uuid>,
}

/// Create enrollment routes
pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(reconcile_enrollments))
        .route("/:id", axum::routing::delete(delete_enrollment))
}

/// List enrollments, optionally by student or subject
#[utoipa::path(
    get,
    path = "/api/enrollments",
    tag = "Enrollments",
    security(("session_cookie" = [])),
    params(EnrollmentFilter),
    responses(
        (status = 200, description = "Enrollments", body = Vec<Enrollment>),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn list_enrollments(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(filter): Query<EnrollmentFilter>,
) -> AppResult<Json<Vec<Enrollment>>> {
    Ok(Json(
        state
            .enrollment_service
            .list(filter.student, filter.subject)
            .await?,
    ))
}

/// Replace a student's full enrollment set atomically (admin only)
#[utoipa::path(
    post,
    path = "/api/enrollments",
    tag = "Enrollments",
    security(("session_cookie" = [])),
    request_body = ReconcileEnrollmentsRequest,
    responses(
        (status = 201, description = "New enrollment set", body = Vec<Enrollment>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Student or subject not found")
    )
)]
pub async fn reconcile_enrollments(
    user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ReconcileEnrollmentsRequest>,
) -> AppResult<(StatusCode, Json<Vec<Enrollment>>)> {
    require_admin(&user)?;

    let enrollments = state
        .enrollment_service
        .reconcile(payload.student_id, payload.subject_ids)
        .await?;

    Ok((StatusCode::CREATED, Json(enrollments)))
}

/// Remove one enrollment (admin only)
#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    tag = "Enrollments",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 204, description = "Enrollment removed"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn delete_enrollment(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&user)?;

    state.enrollment_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
