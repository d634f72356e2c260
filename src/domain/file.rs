//! File domain entities: the physical upload record and its subject binding.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Physical asset record. `storage_key` addresses the object in whatever
/// storage backend is configured.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileUpload {
    pub id: Uuid,
    pub storage_key: String,
    #[schema(example = "lecture-1.pdf")]
    pub file_name: String,
    pub size_bytes: i64,
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Human-facing binding of one upload to one subject.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubjectFile {
    pub id: Uuid,
    pub file_upload_id: Uuid,
    pub subject_id: Uuid,
    #[schema(example = "Week 1 slides")]
    pub title: String,
    pub description: String,
}

/// File read model joining both rows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubjectFileResponse {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl SubjectFileResponse {
    pub fn new(file: SubjectFile, upload: FileUpload) -> Self {
        Self {
            id: file.id,
            subject_id: file.subject_id,
            title: file.title,
            description: file.description,
            file_name: upload.file_name,
            size_bytes: upload.size_bytes,
            mime_type: upload.mime_type,
            uploaded_by: upload.uploaded_by,
            created_at: upload.created_at,
        }
    }
}
