//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and manages database transactions so that
//! multi-row mutations (user + profile, enrollment reconcile, upload + file
//! binding) are never partially observable.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{
    admin_profile, enrollment, file_upload, student_profile, subject_file, teacher_profile, user,
};
use super::repositories::{
    CatalogRepository, CatalogStore, EnrollmentRepository, EnrollmentStore, FileRepository,
    FileStore, UserRepository, UserStore,
};
use crate::domain::{
    AdminProfile, Enrollment, FileUpload, StudentProfile, SubjectFile, TeacherProfile, User,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. Note: the generic `transaction` method makes this trait
/// non-mockable directly; tests mock the repositories and implement this
/// trait by hand.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get catalog repository
    fn catalog(&self) -> Arc<dyn CatalogRepository>;

    /// Get enrollment repository
    fn enrollments(&self) -> Arc<dyn EnrollmentRepository>;

    /// Get file repository
    fn files(&self) -> Arc<dyn FileRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is automatically committed on success or rolled back
    /// on error. Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// User + profile mutations for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }

    /// Enrollment mutations for this transaction
    pub fn enrollments(&self) -> TxEnrollmentRepository<'_> {
        TxEnrollmentRepository::new(self.txn)
    }

    /// File mutations for this transaction
    pub fn files(&self) -> TxFileRepository<'_> {
        TxFileRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    catalog_repo: Arc<CatalogStore>,
    enrollment_repo: Arc<EnrollmentStore>,
    file_repo: Arc<FileStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let catalog_repo = Arc::new(CatalogStore::new(db.clone()));
        let enrollment_repo = Arc::new(EnrollmentStore::new(db.clone()));
        let file_repo = Arc::new(FileStore::new(db.clone()));
        Self {
            db,
            user_repo,
            catalog_repo,
            enrollment_repo,
            file_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog_repo.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentRepository> {
        self.enrollment_repo.clone()
    }

    fn files(&self) -> Arc<dyn FileRepository> {
        self.file_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user + profile mutations.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a user row
    pub async fn insert_user(&self, u: &User) -> AppResult<()> {
        let active = user::ActiveModel {
            id: Set(u.id),
            email: Set(u.email.clone()),
            password_hash: Set(u.password_hash.clone()),
            name: Set(u.name.clone()),
            role: Set(u.role.to_string()),
            created_at: Set(u.created_at),
        };
        active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Insert an admin profile row
    pub async fn insert_admin_profile(&self, p: &AdminProfile) -> AppResult<()> {
        let active = admin_profile::ActiveModel {
            id: Set(p.id),
            user_id: Set(p.user_id),
        };
        active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Insert a teacher profile row
    pub async fn insert_teacher_profile(&self, p: &TeacherProfile) -> AppResult<()> {
        let active = teacher_profile::ActiveModel {
            id: Set(p.id),
            user_id: Set(p.user_id),
            teacher_id: Set(p.teacher_id.clone()),
            department_id: Set(p.department_id),
        };
        active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Insert a student profile row
    pub async fn insert_student_profile(&self, p: &StudentProfile) -> AppResult<()> {
        let active = student_profile::ActiveModel {
            id: Set(p.id),
            user_id: Set(p.user_id),
            student_id: Set(p.student_id.clone()),
            course_id: Set(p.course_id),
            year: Set(p.year),
            semester: Set(p.semester),
        };
        active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Delete whichever profile row is attached to a user, then the user.
    pub async fn delete_user_with_profiles(&self, user_id: Uuid) -> AppResult<()> {
        admin_profile::Entity::delete_many()
            .filter(admin_profile::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;
        teacher_profile::Entity::delete_many()
            .filter(teacher_profile::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;
        student_profile::Entity::delete_many()
            .filter(student_profile::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        let result = user::Entity::delete_by_id(user_id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Transaction-aware enrollment mutations.
pub struct TxEnrollmentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxEnrollmentRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Remove every enrollment held by a student. Returns rows removed.
    pub async fn delete_all_for_student(&self, student_profile_id: Uuid) -> AppResult<u64> {
        let result = enrollment::Entity::delete_many()
            .filter(enrollment::Column::StudentProfileId.eq(student_profile_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }

    /// Insert one enrollment row
    pub async fn insert(&self, e: &Enrollment) -> AppResult<()> {
        let active = enrollment::ActiveModel {
            id: Set(e.id),
            student_profile_id: Set(e.student_profile_id),
            subject_id: Set(e.subject_id),
            enrolled_at: Set(e.enrolled_at),
        };
        active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }
}

/// Transaction-aware file mutations.
pub struct TxFileRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxFileRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert the physical upload record
    pub async fn insert_upload(&self, u: &FileUpload) -> AppResult<()> {
        let active = file_upload::ActiveModel {
            id: Set(u.id),
            storage_key: Set(u.storage_key.clone()),
            file_name: Set(u.file_name.clone()),
            size_bytes: Set(u.size_bytes),
            mime_type: Set(u.mime_type.clone()),
            uploaded_by: Set(u.uploaded_by),
            created_at: Set(u.created_at),
        };
        active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Insert the subject binding record
    pub async fn insert_subject_file(&self, f: &SubjectFile) -> AppResult<()> {
        let active = subject_file::ActiveModel {
            id: Set(f.id),
            file_upload_id: Set(f.file_upload_id),
            subject_id: Set(f.subject_id),
            title: Set(f.title.clone()),
            description: Set(f.description.clone()),
        };
        active.insert(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Delete the subject binding and its upload record together
    pub async fn delete_subject_file_with_upload(
        &self,
        subject_file_id: Uuid,
        file_upload_id: Uuid,
    ) -> AppResult<()> {
        let result = subject_file::Entity::delete_by_id(subject_file_id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        file_upload::Entity::delete_by_id(file_upload_id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
