//! File handlers: multipart upload, listing and deletion.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::{require_admin, require_role, CurrentUser};
use crate::api::AppState;
use crate::config::MAX_UPLOAD_BYTES;
use crate::domain::{Role, SubjectFileResponse};
use crate::errors::{AppError, AppResult};
use crate::services::NewUpload;

/// File list filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct FileFilter {
    /// Narrow to one subject
    pub subject: Option<Uuid>,
}

/// Create file routes
pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_files))
        .route("/:id", get(get_file).delete(delete_file))
}

/// List subject files, optionally by subject
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "Files",
    security(("session_cookie" = [])),
    params(FileFilter),
    responses(
        (status = 200, description = "Files", body = Vec<SubjectFileResponse>),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn list_files(
    _user: CurrentUser,
    State(state): State<AppState>,
    Query(filter): Query<FileFilter>,
) -> AppResult<Json<Vec<SubjectFileResponse>>> {
    Ok(Json(state.file_service.list(filter.subject).await?))
}

/// Get one subject file by id
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "Files",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Subject file ID")),
    responses(
        (status = 200, description = "File", body = SubjectFileResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubjectFileResponse>> {
    Ok(Json(state.file_service.get(id).await?))
}

/// Delete a file: the stored asset is removed first (exactly once), then
/// both rows in one transaction. Allowed for admins and the uploader.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "Files",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Subject file ID")),
    responses(
        (status = 204, description = "File deleted"),
        (status = 401, description = "Missing session or not the uploader"),
        (status = 404, description = "File not found")
    )
)]
pub async fn delete_file(
    user: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let file = state.file_service.get(id).await?;
    if file.uploaded_by != user.id {
        require_admin(&user)?;
    }

    state.file_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload a file and bind it to a subject (admins and teachers).
///
/// Multipart form fields: `file`, `title`, `description`, `subject_id`.
/// The uploader is taken from the session, not from the form.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Files",
    security(("session_cookie" = [])),
    responses(
        (status = 201, description = "File stored and bound", body = SubjectFileResponse),
        (status = 400, description = "Missing or oversized form fields"),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Subject not found")
    )
)]
pub async fn upload(
    user: CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<SubjectFileResponse>)> {
    require_role(&user, Role::Teacher)?;

    let mut bytes: Option<Vec<u8>> = None;
    let mut file_name = None;
    let mut mime_type = None;
    let mut title = None;
    let mut description = None;
    let mut subject_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(str::to_string);
                mime_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read file: {}", e)))?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::validation("File exceeds the upload size limit"));
                }
                bytes = Some(data.to_vec());
            }
            Some("title") => title = Some(read_text(field).await?),
            Some("description") => description = Some(read_text(field).await?),
            Some("subject_id") | Some("subjectId") => {
                let raw = read_text(field).await?;
                subject_id = Some(
                    Uuid::parse_str(raw.trim())
                        .map_err(|_| AppError::validation("subject_id must be a UUID"))?,
                );
            }
            // uploadedBy from legacy clients is ignored; the session decides
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| AppError::validation("file field is required"))?;
    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::validation("title field is required"))?;
    let subject_id = subject_id.ok_or_else(|| AppError::validation("subject_id is required"))?;

    let response = state
        .file_service
        .upload(NewUpload {
            subject_id,
            title,
            description: description.unwrap_or_default(),
            file_name: file_name.unwrap_or_else(|| "upload.bin".to_string()),
            mime_type: mime_type.unwrap_or_else(|| "application/octet-stream".to_string()),
            bytes,
            uploaded_by: user.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Malformed form field: {}", e)))
}
