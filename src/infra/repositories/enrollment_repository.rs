//! Enrollment repository: reads and single-row deletes.
//!
//! The replace-all reconcile is a multi-row mutation and lives on the
//! Unit of Work transaction context.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::entities::{enrollment, student_profile, user};
use crate::domain::{Enrollment, StudentProfile, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Enrollment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Find enrollment by ID
    async fn find(&self, id: Uuid) -> AppResult<Option<Enrollment>>;

    /// List enrollments with optional student/subject filters
    async fn list(
        &self,
        student_profile_id: Option<Uuid>,
        subject_id: Option<Uuid>,
    ) -> AppResult<Vec<Enrollment>>;

    /// Delete one enrollment row
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Enrolled students of a subject, with their user records
    async fn roster(&self, subject_id: Uuid) -> AppResult<Vec<(User, StudentProfile)>>;

    /// Whether a student currently holds an enrollment in a subject
    async fn is_enrolled(&self, student_profile_id: Uuid, subject_id: Uuid) -> AppResult<bool>;

    async fn count_for_subject(&self, subject_id: Uuid) -> AppResult<u64>;
    async fn count_for_student(&self, student_profile_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of EnrollmentRepository
pub struct EnrollmentStore {
    db: DatabaseConnection,
}

impl EnrollmentStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnrollmentRepository for EnrollmentStore {
    async fn find(&self, id: Uuid) -> AppResult<Option<Enrollment>> {
        let result = enrollment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Enrollment::from))
    }

    async fn list(
        &self,
        student_profile_id: Option<Uuid>,
        subject_id: Option<Uuid>,
    ) -> AppResult<Vec<Enrollment>> {
        let mut query = enrollment::Entity::find().order_by_asc(enrollment::Column::EnrolledAt);

        if let Some(student_profile_id) = student_profile_id {
            query = query.filter(enrollment::Column::StudentProfileId.eq(student_profile_id));
        }
        if let Some(subject_id) = subject_id {
            query = query.filter(enrollment::Column::SubjectId.eq(subject_id));
        }

        let models = query.all(&self.db).await.map_err(AppError::from)?;
        Ok(models.into_iter().map(Enrollment::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = enrollment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn roster(&self, subject_id: Uuid) -> AppResult<Vec<(User, StudentProfile)>> {
        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::SubjectId.eq(subject_id))
            .order_by_asc(enrollment::Column::EnrolledAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let profile_ids: Vec<Uuid> = enrollments.iter().map(|e| e.student_profile_id).collect();
        let profiles: HashMap<Uuid, student_profile::Model> = student_profile::Entity::find()
            .filter(student_profile::Column::Id.is_in(profile_ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let user_ids: Vec<Uuid> = profiles.values().map(|p| p.user_id).collect();
        let users: HashMap<Uuid, user::Model> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut entries = Vec::with_capacity(enrollments.len());
        for e in enrollments {
            let Some(profile) = profiles.get(&e.student_profile_id) else {
                continue;
            };
            let Some(user) = users.get(&profile.user_id) else {
                continue;
            };
            entries.push((
                User::try_from(user.clone())?,
                StudentProfile::from(profile.clone()),
            ));
        }

        Ok(entries)
    }

    async fn is_enrolled(&self, student_profile_id: Uuid, subject_id: Uuid) -> AppResult<bool> {
        let count = enrollment::Entity::find()
            .filter(enrollment::Column::StudentProfileId.eq(student_profile_id))
            .filter(enrollment::Column::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn count_for_subject(&self, subject_id: Uuid) -> AppResult<u64> {
        enrollment::Entity::find()
            .filter(enrollment::Column::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_for_student(&self, student_profile_id: Uuid) -> AppResult<u64> {
        enrollment::Entity::find()
            .filter(enrollment::Column::StudentProfileId.eq(student_profile_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
