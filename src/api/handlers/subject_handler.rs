//! Subject handlers.

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
use crate::config::CODE_PATTERN;
use crate::domain::{Subject, SubjectResponse};
use crate::errors::AppResult;

/// Subject creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectRequest {
    /// Subject code, unique within its course
    #[validate(regex(path = *CODE_PATTERN, message = "Code must be 2-16 uppercase letters, digits or dashes"))]
    #[schema(example = "CS101")]
    pub code: String,
    /// Subject display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Introduction to Programming")]
    pub name: String,
    /// Owning course
    pub course_id: Uuid,
}

/// Subject update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSubjectRequest {
    #[validate(regex(path = *CODE_PATTERN, message = "Code must be 2-16 uppercase letters, digits or dashes"))]
    pub code: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
}

/// Subject list filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct SubjectFilter {
    /// Narrow to one course
    pub course: Option<Uuid>,
}

/// Create subject routes
pub fn subject_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subjects).post(create_subject))
        .route(
            "/:id",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
}

/// List subjects, optionally by course
#[utoipa::path(
    get,
    path = "/api/subjects",
    tag = "Subjects",
    security(("session_cookie" = [])),
    params(SubjectFilter),
    responses(
        (status = 200, description = "Subjects", body = Vec<Subject>),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_subjects(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(filter): Query<SubjectFilter>,
) -> AppResult<Json<Vec<Subject>>> {
    Ok(Json(state.catalog_service.list_subjects(filter.course).await?))
}

/// Create a subject (admin only)
#[utoipa::path(
    post,
    path = "/api/subjects",
    tag = "Subjects",
    security(("session_cookie" = [])),
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Validation error or duplicate code in course"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn create_subject(
    user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSubjectRequest>,
) -> AppResult<(StatusCode, Json<Subject>)> {
    require_admin(&user)?;

    let subject = state
        .catalog_service
        .create_subject(payload.code, payload.name, payload.course_id)
        .await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// Get a subject with its assigned teachers.
/// `primary_instructor` is present only when exactly one teacher is
/// assigned; otherwise the instructor is undefined.
#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    tag = "Subjects",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject with assignments", body = SubjectResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Subject not found")
    )
)]
pub async fn get_subject(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubjectResponse>> {
    Ok(Json(state.catalog_service.get_subject(id).await?))
}

/// Update a subject (admin only)
#[utoipa::path(
    put,
    path = "/api/subjects/{id}",
    tag = "Subjects",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Subject ID")),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Subject updated", body = Subject),
        (status = 400, description = "Validation error or duplicate code in course"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Subject not found")
    )
)]
pub async fn update_subject(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSubjectRequest>,
) -> AppResult<Json<Subject>> {
    require_admin(&user)?;

    let subject = state
        .catalog_service
        .update_subject(id, payload.code, payload.name)
        .await?;

    Ok(Json(subject))
}

/// Delete a subject (admin only; rejected while dependents exist)
#[utoipa::path(
    delete,
    path = "/api/subjects/{id}",
    tag = "Subjects",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 204, description = "Subject deleted"),
        (status = 400, description = "Subject still has teachers, enrollments or files"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Subject not found")
    )
)]
pub async fn delete_subject(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&user)?;

    state.catalog_service.delete_subject(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
