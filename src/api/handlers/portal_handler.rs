//! Role portal handlers.
//!
//! Everything here except the login pages sits behind the access guard;
//! handlers read the request context the guard attached and never check
//! the cookie themselves. Page rendering lives elsewhere - these routes
//! serve the role-scoped data the portals consume.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::CurrentUser;
use crate::api::AppState;
use crate::domain::{EnrollmentResponse, StudentResponse, SubjectFileResponse};
use crate::errors::{AppError, AppResult};
use crate::services::TeacherClass;
use crate::types::MessageResponse;

/// Create the three portal routers. The access guard is layered on the
/// full application router; its path matcher covers these prefixes.
pub fn portal_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(admin_login_page))
        .route("/admin/profile", get(profile))
        .route("/teacher/login", get(teacher_login_page))
        .route("/teacher/profile", get(profile))
        .route("/teacher/classes", get(teacher_classes))
        .route("/teacher/classes/:subject_id/students", get(class_roster))
        .route("/student/login", get(student_login_page))
        .route("/student/profile", get(profile))
        .route("/student/subjects", get(student_subjects))
        .route("/student/subjects/:subject_id/files", get(student_subject_files))
}

/// Admin portal login page placeholder (rendering is a frontend concern)
pub async fn admin_login_page() -> Json<MessageResponse> {
    Json(MessageResponse::new("Sign in to the admin portal"))
}

/// Teacher portal login page placeholder
pub async fn teacher_login_page() -> Json<MessageResponse> {
    Json(MessageResponse::new("Sign in to the teacher portal"))
}

/// Student portal login page placeholder
pub async fn student_login_page() -> Json<MessageResponse> {
    Json(MessageResponse::new("Sign in to the student portal"))
}

/// The session context the guard attached: id, role, display name
pub async fn profile(Extension(user): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(user)
}

/// The signed-in teacher's classes
pub async fn teacher_classes(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TeacherClass>>> {
    Ok(Json(state.catalog_service.classes_for_teacher(user.id).await?))
}

/// Roster of a class the signed-in teacher is assigned to
pub async fn class_roster(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
) -> AppResult<Json<Vec<StudentResponse>>> {
    let classes = state.catalog_service.classes_for_teacher(user.id).await?;
    if !classes.iter().any(|c| c.subject.id == subject_id) {
        return Err(AppError::NotFound);
    }

    Ok(Json(state.enrollment_service.roster(subject_id).await?))
}

/// The signed-in student's enrollments
pub async fn student_subjects(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EnrollmentResponse>>> {
    Ok(Json(
        state.enrollment_service.subjects_for_student(user.id).await?,
    ))
}

/// Files of a subject the signed-in student is enrolled in
pub async fn student_subject_files(
    Extension(user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
) -> AppResult<Json<Vec<SubjectFileResponse>>> {
    if !state
        .enrollment_service
        .is_enrolled(user.id, subject_id)
        .await?
    {
        return Err(AppError::NotFound);
    }

    Ok(Json(state.file_service.list(Some(subject_id)).await?))
}
