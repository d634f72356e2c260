//! Student provisioning handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{require_admin, CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::config::CODE_PATTERN;
use crate::domain::StudentResponse;
use crate::errors::AppResult;
use crate::services::{NewStudent, StudentUpdate};

/// Student creation request: account plus profile in one transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "grace@example.edu")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Grace Hopper")]
    pub name: String,
    /// Student natural key, globally unique
    #[validate(regex(path = *CODE_PATTERN, message = "Student ID must be 2-16 uppercase letters, digits or dashes"))]
    #[schema(example = "S-10771")]
    pub student_id: String,
    pub course_id: Uuid,
    #[validate(range(min = 1, max = 8, message = "Year must be between 1 and 8"))]
    #[schema(example = 2)]
    pub year: i16,
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    #[schema(example = 1)]
    pub semester: i16,
}

/// Student update request (role and student_id are immutable)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub course_id: Option<Uuid>,
    #[validate(range(min = 1, max = 8, message = "Year must be between 1 and 8"))]
    pub year: Option<i16>,
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    pub semester: Option<i16>,
}

/// Create student routes
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

/// List students (admin only)
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Students", body = Vec<StudentResponse>),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_students(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StudentResponse>>> {
    require_admin(&user)?;
    Ok(Json(state.provisioning_service.list_students().await?))
}

/// Provision a student account (admin only)
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "Students",
    security(("session_cookie" = [])),
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Validation error or duplicate email/student ID"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn create_student(
    user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStudentRequest>,
) -> AppResult<(StatusCode, Json<StudentResponse>)> {
    require_admin(&user)?;

    let student = state
        .provisioning_service
        .create_student(NewStudent {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            student_id: payload.student_id,
            course_id: payload.course_id,
            year: payload.year,
            semester: payload.semester,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

/// Get a student by user id (admin only)
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    tag = "Students",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Student user ID")),
    responses(
        (status = 200, description = "Student", body = StudentResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StudentResponse>> {
    require_admin(&user)?;
    Ok(Json(state.provisioning_service.get_student(id).await?))
}

/// Update a student (admin only)
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = "Students",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Student user ID")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Validation error or duplicate email"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStudentRequest>,
) -> AppResult<Json<StudentResponse>> {
    require_admin(&user)?;

    let student = state
        .provisioning_service
        .update_student(
            id,
            StudentUpdate {
                email: payload.email,
                name: payload.name,
                course_id: payload.course_id,
                year: payload.year,
                semester: payload.semester,
            },
        )
        .await?;

    Ok(Json(student))
}

/// Delete a student and their profile (admin only; rejected while
/// enrollments exist)
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = "Students",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Student user ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 400, description = "Student still has enrollments"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&user)?;

    state.provisioning_service.delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
