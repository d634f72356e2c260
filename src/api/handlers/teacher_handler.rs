//! Teacher provisioning and class assignment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{require_admin, CurrentUser, ValidatedJson};
use crate::api::AppState;
use crate::config::CODE_PATTERN;
use crate::domain::{ClassAssignment, TeacherResponse};
use crate::errors::AppResult;
use crate::services::{NewTeacher, TeacherUpdate};

/// Teacher creation request: account plus profile in one transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.edu")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Teacher natural key, globally unique
    #[validate(regex(path = *CODE_PATTERN, message = "Teacher ID must be 2-16 uppercase letters, digits or dashes"))]
    #[schema(example = "T-2041")]
    pub teacher_id: String,
    pub department_id: Uuid,
}

/// Teacher update request (role and teacher_id are immutable)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub department_id: Option<Uuid>,
}

/// Class assignment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignSubjectRequest {
    pub subject_id: Uuid,
}

/// Create teacher routes
pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers).post(create_teacher))
        .route(
            "/:id",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/:id/subjects", post(assign_subject))
        .route("/:id/subjects/:subject_id", axum::routing::delete(unassign_subject))
}

/// List teachers (admin only)
#[utoipa::path(
    get,
    path = "/api/teachers",
    tag = "Teachers",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Teachers", body = Vec<TeacherResponse>),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_teachers(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TeacherResponse>>> {
    require_admin(&user)?;
    Ok(Json(state.provisioning_service.list_teachers().await?))
}

/// Provision a teacher account (admin only)
#[utoipa::path(
    post,
    path = "/api/teachers",
    tag = "Teachers",
    security(("session_cookie" = [])),
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Teacher created", body = TeacherResponse),
        (status = 400, description = "Validation error or duplicate email/teacher ID"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn create_teacher(
    user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTeacherRequest>,
) -> AppResult<(StatusCode, Json<TeacherResponse>)> {
    require_admin(&user)?;

    let teacher = state
        .provisioning_service
        .create_teacher(NewTeacher {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            teacher_id: payload.teacher_id,
            department_id: payload.department_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(teacher)))
}

/// Get a teacher by user id (admin only)
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    tag = "Teachers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Teacher user ID")),
    responses(
        (status = 200, description = "Teacher", body = TeacherResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn get_teacher(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TeacherResponse>> {
    require_admin(&user)?;
    Ok(Json(state.provisioning_service.get_teacher(id).await?))
}

/// Update a teacher (admin only)
#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    tag = "Teachers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Teacher user ID")),
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 400, description = "Validation error or duplicate email"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn update_teacher(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTeacherRequest>,
) -> AppResult<Json<TeacherResponse>> {
    require_admin(&user)?;

    let teacher = state
        .provisioning_service
        .update_teacher(
            id,
            TeacherUpdate {
                email: payload.email,
                name: payload.name,
                department_id: payload.department_id,
            },
        )
        .await?;

    Ok(Json(teacher))
}

/// Delete a teacher and their profile (admin only; rejected while classes
/// are assigned)
#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    tag = "Teachers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Teacher user ID")),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 400, description = "Teacher still has assigned classes"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn delete_teacher(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&user)?;

    state.provisioning_service.delete_teacher(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Assign a subject to a teacher, generating the class code (admin only)
#[utoipa::path(
    post,
    path = "/api/teachers/{id}/subjects",
    tag = "Teachers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Teacher user ID")),
    request_body = AssignSubjectRequest,
    responses(
        (status = 201, description = "Assignment created", body = ClassAssignment),
        (status = 400, description = "Teacher already assigned to this subject"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Teacher or subject not found")
    )
)]
pub async fn assign_subject(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignSubjectRequest>,
) -> AppResult<(StatusCode, Json<ClassAssignment>)> {
    require_admin(&user)?;

    let assignment = state
        .catalog_service
        .assign_teacher(id, payload.subject_id)
        .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Remove a teacher's subject assignment (admin only)
#[utoipa::path(
    delete,
    path = "/api/teachers/{id}/subjects/{subject_id}",
    tag = "Teachers",
    security(("session_cookie" = [])),
    params(
        ("id" = Uuid, Path, description = "Teacher user ID"),
        ("subject_id" = Uuid, Path, description = "Subject ID")
    ),
    responses(
        (status = 204, description = "Assignment removed"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn unassign_subject(
    user: CurrentUser,
    State(state): State<AppState>,
    Path((id, subject_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    require_admin(&user)?;

    state.catalog_service.unassign_teacher(id, subject_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
