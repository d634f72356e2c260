//! Course handlers.

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
use crate::domain::Course;
use crate::errors::AppResult;

/// Course creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    /// Course code, globally unique
    #[validate(regex(path = *CODE_PATTERN, message = "Code must be 2-16 uppercase letters, digits or dashes"))]
    #[schema(example = "CS-BSC")]
    pub code: String,
    /// Course display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "BSc Computer Science")]
    pub name: String,
    /// Owning department
    pub department_id: Uuid,
}

/// Course update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseRequest {
    #[validate(regex(path = *CODE_PATTERN, message = "Code must be 2-16 uppercase letters, digits or dashes"))]
    pub code: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub department_id: Option<Uuid>,
}

/// Course list filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct CourseFilter {
    /// Narrow to one department
    pub department: Option<Uuid>,
}

/// Create course routes
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:id", get(get_course).put(update_course).delete(delete_course))
}

/// List courses, optionally by department
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    security(("session_cookie" = [])),
    params(CourseFilter),
    responses(
        (status = 200, description = "Courses", body = Vec<Course>),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_courses(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> AppResult<Json<Vec<Course>>> {
    Ok(Json(
        state.catalog_service.list_courses(filter.department).await?,
    ))
}

/// Create a course (admin only)
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "Courses",
    security(("session_cookie" = [])),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error or duplicate code"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn create_course(
    user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<Course>)> {
    require_admin(&user)?;

    let course = state
        .catalog_service
        .create_course(payload.code, payload.name, payload.department_id)
        .await?;

    Ok((StatusCode::CREATED, Json(course)))
}

/// Get a course by id
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Course>> {
    Ok(Json(state.catalog_service.get_course(id).await?))
}

/// Update a course (admin only)
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Validation error or duplicate code"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCourseRequest>,
) -> AppResult<Json<Course>> {
    require_admin(&user)?;

    let course = state
        .catalog_service
        .update_course(id, payload.code, payload.name, payload.department_id)
        .await?;

    Ok(Json(course))
}

/// Delete a course (admin only; rejected while children exist)
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 400, description = "Course still has subjects or students"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&user)?;

    state.catalog_service.delete_course(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
