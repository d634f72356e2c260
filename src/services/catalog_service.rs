//! Catalog service - department/course/subject CRUD and class assignments.
//!
//! Uniqueness checks run before every create/update and deletes are
//! rejected while dependent rows exist, so the hierarchy never dangles.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ClassAssignment, Course, Department, Subject, SubjectResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// A teacher's class: the assignment join plus its subject.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeacherClass {
    pub assignment: ClassAssignment,
    pub subject: Subject,
}

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    // Departments
    async fn create_department(&self, code: String, name: String) -> AppResult<Department>;
    async fn list_departments(&self) -> AppResult<Vec<Department>>;
    async fn get_department(&self, id: Uuid) -> AppResult<Department>;
    async fn update_department(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
    ) -> AppResult<Department>;
    async fn delete_department(&self, id: Uuid) -> AppResult<()>;

    // Courses
    async fn create_course(
        &self,
        code: String,
        name: String,
        department_id: Uuid,
    ) -> AppResult<Course>;
    async fn list_courses(&self, department_id: Option<Uuid>) -> AppResult<Vec<Course>>;
    async fn get_course(&self, id: Uuid) -> AppResult<Course>;
    async fn update_course(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
        department_id: Option<Uuid>,
    ) -> AppResult<Course>;
    async fn delete_course(&self, id: Uuid) -> AppResult<()>;

    // Subjects
    async fn create_subject(
        &self,
        code: String,
        name: String,
        course_id: Uuid,
    ) -> AppResult<Subject>;
    async fn list_subjects(&self, course_id: Option<Uuid>) -> AppResult<Vec<Subject>>;
    async fn get_subject(&self, id: Uuid) -> AppResult<SubjectResponse>;
    async fn update_subject(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
    ) -> AppResult<Subject>;
    async fn delete_subject(&self, id: Uuid) -> AppResult<()>;

    // Class assignments (teacher addressed by user id, as on the REST surface)
    async fn assign_teacher(
        &self,
        teacher_user_id: Uuid,
        subject_id: Uuid,
    ) -> AppResult<ClassAssignment>;
    async fn unassign_teacher(&self, teacher_user_id: Uuid, subject_id: Uuid) -> AppResult<()>;
    async fn classes_for_teacher(&self, teacher_user_id: Uuid) -> AppResult<Vec<TeacherClass>>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    /// Create new catalog service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Class codes are derived from the subject code plus a short random
    /// suffix, e.g. "CS101-4F2A9C".
    fn generate_class_code(subject_code: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
        format!("{}-{}", subject_code, suffix)
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn create_department(&self, code: String, name: String) -> AppResult<Department> {
        if self
            .uow
            .catalog()
            .find_department_by_code(&code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Department code already exists"));
        }

        let department = Department {
            id: Uuid::new_v4(),
            code,
            name,
            created_at: Utc::now(),
        };

        self.uow.catalog().insert_department(department).await
    }

    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        self.uow.catalog().list_departments().await
    }

    async fn get_department(&self, id: Uuid) -> AppResult<Department> {
        self.uow
            .catalog()
            .find_department(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_department(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
    ) -> AppResult<Department> {
        self.get_department(id).await?;

        if let Some(ref code) = code {
            if let Some(existing) = self.uow.catalog().find_department_by_code(code).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Department code already exists"));
                }
            }
        }

        self.uow.catalog().update_department(id, code, name).await
    }

    async fn delete_department(&self, id: Uuid) -> AppResult<()> {
        self.get_department(id).await?;

        if self.uow.catalog().count_courses_in_department(id).await? > 0 {
            return Err(AppError::conflict("Department has courses"));
        }
        if self.uow.catalog().count_teachers_in_department(id).await? > 0 {
            return Err(AppError::conflict("Department has teachers"));
        }

        self.uow.catalog().delete_department(id).await
    }

    async fn create_course(
        &self,
        code: String,
        name: String,
        department_id: Uuid,
    ) -> AppResult<Course> {
        self.get_department(department_id).await?;

        if self
            .uow
            .catalog()
            .find_course_by_code(&code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Course code already exists"));
        }

        let course = Course {
            id: Uuid::new_v4(),
            code,
            name,
            department_id,
            created_at: Utc::now(),
        };

        self.uow.catalog().insert_course(course).await
    }

    async fn list_courses(&self, department_id: Option<Uuid>) -> AppResult<Vec<Course>> {
        self.uow.catalog().list_courses(department_id).await
    }

    async fn get_course(&self, id: Uuid) -> AppResult<Course> {
        self.uow
            .catalog()
            .find_course(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_course(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
        department_id: Option<Uuid>,
    ) -> AppResult<Course> {
        self.get_course(id).await?;

        if let Some(ref code) = code {
            if let Some(existing) = self.uow.catalog().find_course_by_code(code).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Course code already exists"));
                }
            }
        }
        if let Some(department_id) = department_id {
            self.get_department(department_id).await?;
        }

        self.uow
            .catalog()
            .update_course(id, code, name, department_id)
            .await
    }

    async fn delete_course(&self, id: Uuid) -> AppResult<()> {
        self.get_course(id).await?;

        if self.uow.catalog().count_subjects_in_course(id).await? > 0 {
            return Err(AppError::conflict("Course has subjects"));
        }
        if self.uow.catalog().count_students_in_course(id).await? > 0 {
            return Err(AppError::conflict("Course has enrolled students"));
        }

        self.uow.catalog().delete_course(id).await
    }

    async fn create_subject(
        &self,
        code: String,
        name: String,
        course_id: Uuid,
    ) -> AppResult<Subject> {
        self.get_course(course_id).await?;

        if self
            .uow
            .catalog()
            .find_subject_by_code(course_id, &code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Subject code already exists in this course"));
        }

        let subject = Subject {
            id: Uuid::new_v4(),
            code,
            name,
            course_id,
            created_at: Utc::now(),
        };

        self.uow.catalog().insert_subject(subject).await
    }

    async fn list_subjects(&self, course_id: Option<Uuid>) -> AppResult<Vec<Subject>> {
        self.uow.catalog().list_subjects(course_id).await
    }

    async fn get_subject(&self, id: Uuid) -> AppResult<SubjectResponse> {
        let subject = self
            .uow
            .catalog()
            .find_subject(id)
            .await?
            .ok_or(AppError::NotFound)?;
        let teachers = self.uow.catalog().list_teachers_for_subject(id).await?;

        Ok(SubjectResponse::new(subject, teachers))
    }

    async fn update_subject(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
    ) -> AppResult<Subject> {
        let subject = self
            .uow
            .catalog()
            .find_subject(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(ref code) = code {
            if let Some(existing) = self
                .uow
                .catalog()
                .find_subject_by_code(subject.course_id, code)
                .await?
            {
                if existing.id != id {
                    return Err(AppError::conflict("Subject code already exists in this course"));
                }
            }
        }

        self.uow.catalog().update_subject(id, code, name).await
    }

    async fn delete_subject(&self, id: Uuid) -> AppResult<()> {
        self.uow
            .catalog()
            .find_subject(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if self.uow.catalog().count_assignments_for_subject(id).await? > 0 {
            return Err(AppError::conflict("Subject has assigned teachers"));
        }
        if self.uow.enrollments().count_for_subject(id).await? > 0 {
            return Err(AppError::conflict("Subject has enrollments"));
        }
        if self.uow.files().count_for_subject(id).await? > 0 {
            return Err(AppError::conflict("Subject has files"));
        }

        self.uow.catalog().delete_subject(id).await
    }

    async fn assign_teacher(
        &self,
        teacher_user_id: Uuid,
        subject_id: Uuid,
    ) -> AppResult<ClassAssignment> {
        let profile = self
            .uow
            .users()
            .find_teacher_profile_by_user(teacher_user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let subject = self
            .uow
            .catalog()
            .find_subject(subject_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if self
            .uow
            .catalog()
            .find_assignment_by_pair(profile.id, subject_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Teacher is already assigned to this subject"));
        }

        let assignment = ClassAssignment {
            id: Uuid::new_v4(),
            teacher_profile_id: profile.id,
            subject_id,
            class_code: Self::generate_class_code(&subject.code),
            created_at: Utc::now(),
        };

        self.uow.catalog().insert_assignment(assignment).await
    }

    async fn unassign_teacher(&self, teacher_user_id: Uuid, subject_id: Uuid) -> AppResult<()> {
        let profile = self
            .uow
            .users()
            .find_teacher_profile_by_user(teacher_user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let assignment = self
            .uow
            .catalog()
            .find_assignment_by_pair(profile.id, subject_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.catalog().delete_assignment(assignment.id).await
    }

    async fn classes_for_teacher(&self, teacher_user_id: Uuid) -> AppResult<Vec<TeacherClass>> {
        let profile = self
            .uow
            .users()
            .find_teacher_profile_by_user(teacher_user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let assignments = self
            .uow
            .catalog()
            .list_assignments_for_teacher(profile.id)
            .await?;
        let subject_ids: Vec<Uuid> = assignments.iter().map(|a| a.subject_id).collect();
        let subjects = self.uow.catalog().list_subjects_by_ids(subject_ids).await?;

        let classes = assignments
            .into_iter()
            .filter_map(|assignment| {
                subjects
                    .iter()
                    .find(|s| s.id == assignment.subject_id)
                    .cloned()
                    .map(|subject| TeacherClass {
                        assignment,
                        subject,
                    })
            })
            .collect();

        Ok(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssignedTeacher;
    use crate::infra::MockCatalogRepository;
    use crate::services::test_support::TestUow;

    fn department(code: &str) -> Department {
        Department {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: "Computer Science".to_string(),
            created_at: Utc::now(),
        }
    }

    fn course(id: Uuid) -> Course {
        Course {
            id,
            code: "CS-BSC".to_string(),
            name: "BSc Computer Science".to_string(),
            department_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn subject(id: Uuid) -> Subject {
        Subject {
            id,
            code: "CS101".to_string(),
            name: "Intro".to_string(),
            course_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn teacher(name: &str) -> AssignedTeacher {
        AssignedTeacher {
            teacher_profile_id: Uuid::new_v4(),
            teacher_id: "T-1".to_string(),
            name: name.to_string(),
            class_code: "CS101-AB12CD".to_string(),
        }
    }

    fn uow_with_catalog(catalog: MockCatalogRepository) -> Arc<TestUow> {
        Arc::new(TestUow {
            catalog: Arc::new(catalog),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_duplicate_department_code_is_conflict_and_not_persisted() {
        let mut catalog = MockCatalogRepository::new();
        // No insert_department expectation: persisting the duplicate would
        // panic the test
        catalog
            .expect_find_department_by_code()
            .returning(|code| Ok(Some(department(code))));

        let service = CatalogManager::new(uow_with_catalog(catalog));
        let result = service
            .create_department("CS".to_string(), "Computer Science".to_string())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_department_with_fresh_code() {
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_find_department_by_code().returning(|_| Ok(None));
        catalog.expect_insert_department().returning(Ok);

        let service = CatalogManager::new(uow_with_catalog(catalog));
        let created = service
            .create_department("CS".to_string(), "Computer Science".to_string())
            .await
            .unwrap();

        assert_eq!(created.code, "CS");
    }

    #[tokio::test]
    async fn test_delete_course_with_subjects_is_conflict() {
        let course_id = Uuid::new_v4();

        let mut catalog = MockCatalogRepository::new();
        // No delete_course expectation: the row must survive the rejection
        catalog
            .expect_find_course()
            .returning(|id| Ok(Some(course(id))));
        catalog
            .expect_count_subjects_in_course()
            .returning(|_| Ok(1));

        let service = CatalogManager::new(uow_with_catalog(catalog));
        let result = service.delete_course(course_id).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_subject_with_one_teacher_has_primary_instructor() {
        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_subject()
            .returning(|id| Ok(Some(subject(id))));
        catalog
            .expect_list_teachers_for_subject()
            .returning(|_| Ok(vec![teacher("Ada")]));

        let service = CatalogManager::new(uow_with_catalog(catalog));
        let response = service.get_subject(Uuid::new_v4()).await.unwrap();

        assert_eq!(response.primary_instructor.unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_subject_with_two_teachers_has_no_primary_instructor() {
        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_subject()
            .returning(|id| Ok(Some(subject(id))));
        catalog
            .expect_list_teachers_for_subject()
            .returning(|_| Ok(vec![teacher("Ada"), teacher("Grace")]));

        let service = CatalogManager::new(uow_with_catalog(catalog));
        let response = service.get_subject(Uuid::new_v4()).await.unwrap();

        assert!(response.primary_instructor.is_none());
        assert_eq!(response.teachers.len(), 2);
    }

    #[test]
    fn test_class_codes_carry_the_subject_code() {
        let code = CatalogManager::<TestUow>::generate_class_code("CS101");
        assert!(code.starts_with("CS101-"));
        assert_eq!(code.len(), "CS101-".len() + 6);
    }
}
