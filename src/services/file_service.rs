//! File service - upload, listing and deletion of subject files.
//!
//! An upload stores the asset first, then creates the FileUpload and
//! SubjectFile rows in one transaction; when the transaction fails the
//! stored object is removed again so no orphan asset survives. Deletion
//! removes the asset exactly once, then both rows.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{FileUpload, SubjectFile, SubjectFileResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::{ObjectStorage, UnitOfWork};

/// Input for an upload.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub subject_id: Uuid,
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub uploaded_by: Uuid,
}

/// File service trait for dependency injection.
#[async_trait]
pub trait FileService: Send + Sync {
    /// Store the asset and create both database rows
    async fn upload(&self, input: NewUpload) -> AppResult<SubjectFileResponse>;

    /// List subject files, optionally narrowed to one subject
    async fn list(&self, subject_id: Option<Uuid>) -> AppResult<Vec<SubjectFileResponse>>;

    /// Get one subject file by id
    async fn get(&self, id: Uuid) -> AppResult<SubjectFileResponse>;

    /// Delete the stored asset, then both rows
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of FileService using Unit of Work and a storage
/// backend.
pub struct FileManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn ObjectStorage>,
}

impl<U: UnitOfWork> FileManager<U> {
    /// Create new file service instance
    pub fn new(uow: Arc<U>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { uow, storage }
    }

    /// Storage keys are generated, never taken from the client: a fresh
    /// uuid plus the sanitized extension of the original file name.
    fn generate_key(file_name: &str) -> String {
        let ext: String = file_name
            .rsplit('.')
            .next()
            .unwrap_or("")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(8)
            .collect::<String>()
            .to_lowercase();

        if ext.is_empty() {
            Uuid::new_v4().simple().to_string()
        } else {
            format!("{}.{}", Uuid::new_v4().simple(), ext)
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> FileService for FileManager<U> {
    async fn upload(&self, input: NewUpload) -> AppResult<SubjectFileResponse> {
        self.uow
            .catalog()
            .find_subject(input.subject_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let storage_key = Self::generate_key(&input.file_name);
        self.storage.put(&storage_key, &input.bytes).await?;

        let upload = FileUpload {
            id: Uuid::new_v4(),
            storage_key: storage_key.clone(),
            file_name: input.file_name,
            size_bytes: input.bytes.len() as i64,
            mime_type: input.mime_type,
            uploaded_by: input.uploaded_by,
            created_at: Utc::now(),
        };
        let file = SubjectFile {
            id: Uuid::new_v4(),
            file_upload_id: upload.id,
            subject_id: input.subject_id,
            title: input.title,
            description: input.description,
        };

        let (upload_row, file_row) = (upload.clone(), file.clone());
        let result = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.files().insert_upload(&upload_row).await?;
                    ctx.files().insert_subject_file(&file_row).await?;
                    Ok(())
                })
            })
            .await;

        if let Err(e) = result {
            // Best effort: don't leave an orphan object behind the failed rows
            if let Err(cleanup) = self.storage.delete(&storage_key).await {
                tracing::error!(key = %storage_key, error = %cleanup, "Orphan cleanup failed");
            }
            return Err(e);
        }

        tracing::info!(file = %file.id, subject = %file.subject_id, "File uploaded");
        Ok(SubjectFileResponse::new(file, upload))
    }

    async fn list(&self, subject_id: Option<Uuid>) -> AppResult<Vec<SubjectFileResponse>> {
        let pairs = self.uow.files().list(subject_id).await?;

        Ok(pairs
            .into_iter()
            .map(|(file, upload)| SubjectFileResponse::new(file, upload))
            .collect())
    }

    async fn get(&self, id: Uuid) -> AppResult<SubjectFileResponse> {
        let (file, upload) = self
            .uow
            .files()
            .find(id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(SubjectFileResponse::new(file, upload))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let (file, upload) = self
            .uow
            .files()
            .find(id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Remote asset first, then the rows; the asset is removed exactly once
        self.storage.delete(&upload.storage_key).await?;

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.files()
                        .delete_subject_file_with_upload(file.id, upload.id)
                        .await
                })
            })
            .await?;

        tracing::info!(file = %id, "File deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockCatalogRepository, MockFileRepository, MockObjectStorage};
    use crate::services::test_support::TestUow;

    fn upload_input(subject_id: Uuid) -> NewUpload {
        NewUpload {
            subject_id,
            title: "Week 1 slides".to_string(),
            description: "Intro lecture".to_string(),
            file_name: "lecture-1.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: b"pdf bytes".to_vec(),
            uploaded_by: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_generated_keys_keep_the_extension() {
        let key = FileManager::<TestUow>::generate_key("Lecture Notes.PDF");
        assert!(key.ends_with(".pdf"));

        let other = FileManager::<TestUow>::generate_key("Lecture Notes.PDF");
        assert_ne!(key, other);
    }

    #[test]
    fn test_generated_keys_without_extension_are_bare_uuids() {
        let key = FileManager::<TestUow>::generate_key("Makefile");
        assert!(!key.contains('.'));
    }

    #[tokio::test]
    async fn test_upload_to_unknown_subject_touches_no_storage() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_subject().returning(|_| Ok(None));

        let uow = Arc::new(TestUow {
            catalog: Arc::new(catalog),
            ..Default::default()
        });
        // No put expectation: a storage write would panic the test
        let storage = Arc::new(MockObjectStorage::new());

        let result = FileManager::new(uow, storage)
            .upload(upload_input(Uuid::new_v4()))
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_removes_the_asset_exactly_once_before_the_rows() {
        let subject_file = SubjectFile {
            id: Uuid::new_v4(),
            file_upload_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            title: "Week 1 slides".to_string(),
            description: String::new(),
        };
        let upload = FileUpload {
            id: subject_file.file_upload_id,
            storage_key: "abc123.pdf".to_string(),
            file_name: "lecture-1.pdf".to_string(),
            size_bytes: 9,
            mime_type: "application/pdf".to_string(),
            uploaded_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let mut files = MockFileRepository::new();
        let pair = (subject_file.clone(), upload.clone());
        files
            .expect_find()
            .returning(move |_| Ok(Some(pair.clone())));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_delete()
            .withf(|key| key == "abc123.pdf")
            .times(1)
            .returning(|_| Ok(()));

        let uow = Arc::new(TestUow {
            files: Arc::new(files),
            ..Default::default()
        });
        // The row transaction is unavailable in the test mock, so the call
        // fails after the storage deletion - which is the part under test
        let result = FileManager::new(uow, Arc::new(storage))
            .delete(subject_file.id)
            .await;

        assert!(result.is_err());
    }
}
