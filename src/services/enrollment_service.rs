//! Enrollment service - reconciles a student's enrollment set.
//!
//! The POST surface replaces a student's full set of enrollments, so the
//! operation is a reconcile over a set executed in one transaction, never a
//! sequence of independent inserts. Together with the unique constraint on
//! (student, subject) this keeps at most one row per pair.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Enrollment, EnrollmentResponse, StudentResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Enrollment service trait for dependency injection.
///
/// Students are addressed by their user id, as on the REST surface.
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Replace a student's full enrollment set atomically.
    /// Duplicate subject ids collapse; order is not meaningful.
    async fn reconcile(
        &self,
        student_user_id: Uuid,
        subject_ids: Vec<Uuid>,
    ) -> AppResult<Vec<Enrollment>>;

    /// List enrollments with optional student/subject filters
    async fn list(
        &self,
        student_user_id: Option<Uuid>,
        subject_id: Option<Uuid>,
    ) -> AppResult<Vec<Enrollment>>;

    /// Remove one enrollment row
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// A student's enrollments with subject context (student portal)
    async fn subjects_for_student(
        &self,
        student_user_id: Uuid,
    ) -> AppResult<Vec<EnrollmentResponse>>;

    /// Enrolled students of a subject (teacher portal roster)
    async fn roster(&self, subject_id: Uuid) -> AppResult<Vec<StudentResponse>>;

    /// Whether a student currently holds an enrollment in a subject
    async fn is_enrolled(&self, student_user_id: Uuid, subject_id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of EnrollmentService using Unit of Work.
pub struct EnrollmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EnrollmentManager<U> {
    /// Create new enrollment service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn profile_id_for_user(&self, student_user_id: Uuid) -> AppResult<Uuid> {
        self.uow
            .users()
            .find_student_profile_by_user(student_user_id)
            .await?
            .map(|p| p.id)
            .ok_or(AppError::NotFound)
    }

    /// Collapse duplicate subject ids, keeping first-seen order.
    fn dedupe_subject_ids(subject_ids: Vec<Uuid>) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        subject_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

#[async_trait]
impl<U: UnitOfWork> EnrollmentService for EnrollmentManager<U> {
    async fn reconcile(
        &self,
        student_user_id: Uuid,
        subject_ids: Vec<Uuid>,
    ) -> AppResult<Vec<Enrollment>> {
        let profile_id = self.profile_id_for_user(student_user_id).await?;

        // Collapse duplicates before touching the store
        let subject_ids = Self::dedupe_subject_ids(subject_ids);

        let known = self
            .uow
            .catalog()
            .list_subjects_by_ids(subject_ids.clone())
            .await?;
        if known.len() != subject_ids.len() {
            return Err(AppError::NotFound);
        }

        let now = Utc::now();
        let enrollments: Vec<Enrollment> = subject_ids
            .iter()
            .map(|subject_id| Enrollment {
                id: Uuid::new_v4(),
                student_profile_id: profile_id,
                subject_id: *subject_id,
                enrolled_at: now,
            })
            .collect();

        let to_insert = enrollments.clone();
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let removed = ctx.enrollments().delete_all_for_student(profile_id).await?;
                    tracing::debug!(
                        student_profile = %profile_id,
                        removed = removed,
                        inserted = to_insert.len(),
                        "Reconciling enrollments"
                    );
                    for enrollment in &to_insert {
                        ctx.enrollments().insert(enrollment).await?;
                    }
                    Ok(())
                })
            })
            .await?;

        Ok(enrollments)
    }

    async fn list(
        &self,
        student_user_id: Option<Uuid>,
        subject_id: Option<Uuid>,
    ) -> AppResult<Vec<Enrollment>> {
        let profile_id = match student_user_id {
            Some(user_id) => Some(self.profile_id_for_user(user_id).await?),
            None => None,
        };

        self.uow.enrollments().list(profile_id, subject_id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.uow
            .enrollments()
            .find(id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.enrollments().delete(id).await
    }

    async fn subjects_for_student(
        &self,
        student_user_id: Uuid,
    ) -> AppResult<Vec<EnrollmentResponse>> {
        let profile_id = self.profile_id_for_user(student_user_id).await?;

        let enrollments = self.uow.enrollments().list(Some(profile_id), None).await?;
        let subject_ids: Vec<Uuid> = enrollments.iter().map(|e| e.subject_id).collect();
        let subjects = self.uow.catalog().list_subjects_by_ids(subject_ids).await?;

        let responses = enrollments
            .into_iter()
            .filter_map(|enrollment| {
                subjects
                    .iter()
                    .find(|s| s.id == enrollment.subject_id)
                    .map(|subject| EnrollmentResponse {
                        id: enrollment.id,
                        student_profile_id: enrollment.student_profile_id,
                        subject_id: enrollment.subject_id,
                        subject_code: subject.code.clone(),
                        subject_name: subject.name.clone(),
                        enrolled_at: enrollment.enrolled_at,
                    })
            })
            .collect();

        Ok(responses)
    }

    async fn roster(&self, subject_id: Uuid) -> AppResult<Vec<StudentResponse>> {
        let entries = self.uow.enrollments().roster(subject_id).await?;

        Ok(entries
            .into_iter()
            .map(|(user, profile)| StudentResponse::new(user, profile))
            .collect())
    }

    async fn is_enrolled(&self, student_user_id: Uuid, subject_id: Uuid) -> AppResult<bool> {
        let profile_id = self.profile_id_for_user(student_user_id).await?;
        self.uow
            .enrollments()
            .is_enrolled(profile_id, subject_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StudentProfile;
    use crate::infra::{MockCatalogRepository, MockEnrollmentRepository, MockUserRepository};
    use crate::services::test_support::TestUow;

    fn student_profile(user_id: Uuid) -> StudentProfile {
        StudentProfile {
            id: Uuid::new_v4(),
            user_id,
            student_id: "S-10771".to_string(),
            course_id: Uuid::new_v4(),
            year: 2,
            semester: 1,
        }
    }

    #[test]
    fn test_duplicate_subject_ids_collapse_to_one() {
        let subject = Uuid::new_v4();
        let other = Uuid::new_v4();

        let deduped =
            EnrollmentManager::<TestUow>::dedupe_subject_ids(vec![subject, other, subject]);

        assert_eq!(deduped, vec![subject, other]);
    }

    #[tokio::test]
    async fn test_reconcile_checks_the_deduped_set_against_known_subjects() {
        let subject = Uuid::new_v4();

        let mut users = MockUserRepository::new();
        users
            .expect_find_student_profile_by_user()
            .returning(|user_id| Ok(Some(student_profile(user_id))));

        let mut catalog = MockCatalogRepository::new();
        // Two POSTed copies of the same subject reach the store as one id
        catalog
            .expect_list_subjects_by_ids()
            .withf(|ids| ids.len() == 1)
            .returning(|_| Ok(Vec::new()));

        let uow = Arc::new(TestUow {
            users: Arc::new(users),
            catalog: Arc::new(catalog),
            ..Default::default()
        });
        let result = EnrollmentManager::new(uow)
            .reconcile(Uuid::new_v4(), vec![subject, subject])
            .await;

        // The store knows none of the ids, so the reconcile is rejected
        // before any row is touched
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_reconcile_unknown_student_is_not_found() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_student_profile_by_user()
            .returning(|_| Ok(None));

        let uow = Arc::new(TestUow {
            users: Arc::new(users),
            ..Default::default()
        });
        let result = EnrollmentManager::new(uow)
            .reconcile(Uuid::new_v4(), vec![Uuid::new_v4()])
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_enrollment_is_not_found() {
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_find().returning(|_| Ok(None));

        let uow = Arc::new(TestUow {
            enrollments: Arc::new(enrollments),
            ..Default::default()
        });
        let result = EnrollmentManager::new(uow).delete(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
