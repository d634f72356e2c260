//! Department handlers.

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
use crate::domain::Department;
use crate::errors::AppResult;

/// Department creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentRequest {
    /// Department code, globally unique
    #[validate(regex(path = *CODE_PATTERN, message = "Code must be 2-16 uppercase letters, digits or dashes"))]
    #[schema(example = "CS")]
    pub code: String,
    /// Department display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Computer Science")]
    pub name: String,
}

/// Department update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentRequest {
    #[validate(regex(path = *CODE_PATTERN, message = "Code must be 2-16 uppercase letters, digits or dashes"))]
    pub code: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
}

/// Create department routes
pub fn department_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/:id",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}

/// List departments
#[utoipa::path(
    get,
    path = "/api/departments",
    tag = "Departments",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "All departments", body = Vec<Department>),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_departments(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Department>>> {
    Ok(Json(state.catalog_service.list_departments().await?))
}

/// Create a department (admin only)
#[utoipa::path(
    post,
    path = "/api/departments",
    tag = "Departments",
    security(("session_cookie" = [])),
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Validation error or duplicate code"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn create_department(
    user: CurrentUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateDepartmentRequest>,
) -> AppResult<(StatusCode, Json<Department>)> {
    require_admin(&user)?;

    let department = state
        .catalog_service
        .create_department(payload.code, payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(department)))
}

/// Get a department by id
#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    tag = "Departments",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn get_department(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Department>> {
    Ok(Json(state.catalog_service.get_department(id).await?))
}

/// Update a department (admin only)
#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    tag = "Departments",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartmentRequest,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Validation error or duplicate code"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn update_department(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDepartmentRequest>,
) -> AppResult<Json<Department>> {
    require_admin(&user)?;

    let department = state
        .catalog_service
        .update_department(id, payload.code, payload.name)
        .await?;

    Ok(Json(department))
}

/// Delete a department (admin only; rejected while children exist)
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    tag = "Departments",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 400, description = "Department still has courses or teachers"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Department not found")
    )
)]
pub async fn delete_department(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&user)?;

    state.catalog_service.delete_department(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
