//! File repository: subject file reads.
//!
//! Upload and deletion touch two rows each and live on the Unit of Work
//! transaction context.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::{file_upload, subject_file};
use crate::domain::{FileUpload, SubjectFile};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// File repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Find a subject file (with its upload record) by the subject-file id
    async fn find(&self, id: Uuid) -> AppResult<Option<(SubjectFile, FileUpload)>>;

    /// List subject files, optionally narrowed to one subject
    async fn list(&self, subject_id: Option<Uuid>) -> AppResult<Vec<(SubjectFile, FileUpload)>>;

    async fn count_for_subject(&self, subject_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of FileRepository
pub struct FileStore {
    db: DatabaseConnection,
}

impl FileStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn attach_uploads(
        &self,
        files: Vec<subject_file::Model>,
    ) -> AppResult<Vec<(SubjectFile, FileUpload)>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let upload_ids: Vec<Uuid> = files.iter().map(|f| f.file_upload_id).collect();
        let uploads: HashMap<Uuid, file_upload::Model> = file_upload::Entity::find()
            .filter(file_upload::Column::Id.is_in(upload_ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut pairs = Vec::with_capacity(files.len());
        for file in files {
            let Some(upload) = uploads.get(&file.file_upload_id) else {
                continue;
            };
            pairs.push((SubjectFile::from(file), FileUpload::from(upload.clone())));
        }

        Ok(pairs)
    }
}

#[async_trait]
impl FileRepository for FileStore {
    async fn find(&self, id: Uuid) -> AppResult<Option<(SubjectFile, FileUpload)>> {
        let Some(file) = subject_file::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
        else {
            return Ok(None);
        };

        let upload = file_upload::Entity::find_by_id(file.file_upload_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::internal("Subject file without upload record"))?;

        Ok(Some((SubjectFile::from(file), FileUpload::from(upload))))
    }

    async fn list(&self, subject_id: Option<Uuid>) -> AppResult<Vec<(SubjectFile, FileUpload)>> {
        let mut query = subject_file::Entity::find().order_by_asc(subject_file::Column::Title);

        if let Some(subject_id) = subject_id {
            query = query.filter(subject_file::Column::SubjectId.eq(subject_id));
        }

        let files = query.all(&self.db).await.map_err(AppError::from)?;
        self.attach_uploads(files).await
    }

    async fn count_for_subject(&self, subject_id: Uuid) -> AppResult<u64> {
        subject_file::Entity::find()
            .filter(subject_file::Column::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
