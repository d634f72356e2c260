//! Provisioning service - creates and manages users with their role
//! profiles.
//!
//! User + profile creation and deletion are single transactions; a half
//! provisioned account is never observable.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    AdminProfile, Password, Role, StudentProfile, StudentResponse, TeacherProfile,
    TeacherResponse, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Input for creating a teacher account.
#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub email: String,
    pub password: String,
    pub name: String,
    pub teacher_id: String,
    pub department_id: Uuid,
}

/// Input for updating a teacher account.
#[derive(Debug, Clone, Default)]
pub struct TeacherUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub department_id: Option<Uuid>,
}

/// Input for creating a student account.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub email: String,
    pub password: String,
    pub name: String,
    pub student_id: String,
    pub course_id: Uuid,
    pub year: i16,
    pub semester: i16,
}

/// Input for updating a student account.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub course_id: Option<Uuid>,
    pub year: Option<i16>,
    pub semester: Option<i16>,
}

/// Provisioning service trait for dependency injection.
#[async_trait]
pub trait ProvisioningService: Send + Sync {
    /// Create an admin account (CLI bootstrap; no REST surface exists)
    async fn create_admin(&self, email: String, password: String, name: String)
        -> AppResult<User>;

    async fn create_teacher(&self, input: NewTeacher) -> AppResult<TeacherResponse>;
    async fn list_teachers(&self) -> AppResult<Vec<TeacherResponse>>;
    async fn get_teacher(&self, user_id: Uuid) -> AppResult<TeacherResponse>;
    async fn update_teacher(&self, user_id: Uuid, update: TeacherUpdate)
        -> AppResult<TeacherResponse>;
    async fn delete_teacher(&self, user_id: Uuid) -> AppResult<()>;

    async fn create_student(&self, input: NewStudent) -> AppResult<StudentResponse>;
    async fn list_students(&self) -> AppResult<Vec<StudentResponse>>;
    async fn get_student(&self, user_id: Uuid) -> AppResult<StudentResponse>;
    async fn update_student(&self, user_id: Uuid, update: StudentUpdate)
        -> AppResult<StudentResponse>;
    async fn delete_student(&self, user_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProvisioningService using Unit of Work.
pub struct Registrar<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Registrar<U> {
    /// Create new provisioning service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Reject when another account already holds this email.
    async fn check_email_free(&self, email: &str, exclude: Option<Uuid>) -> AppResult<()> {
        if let Some(existing) = self.uow.users().find_by_email(email).await? {
            if Some(existing.id) != exclude {
                return Err(AppError::conflict("Email already exists"));
            }
        }
        Ok(())
    }

    fn build_user(email: String, password: &str, name: String, role: Role) -> AppResult<User> {
        let password_hash = Password::new(password)?.into_string();
        Ok(User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            role,
            created_at: Utc::now(),
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> ProvisioningService for Registrar<U> {
    async fn create_admin(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> AppResult<User> {
        self.check_email_free(&email, None).await?;

        let user = Self::build_user(email, &password, name, Role::Admin)?;
        let profile = AdminProfile {
            id: Uuid::new_v4(),
            user_id: user.id,
        };

        let created = user.clone();
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.users().insert_user(&user).await?;
                    ctx.users().insert_admin_profile(&profile).await?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!(user = %created.id, "Admin account provisioned");
        Ok(created)
    }

    async fn create_teacher(&self, input: NewTeacher) -> AppResult<TeacherResponse> {
        self.check_email_free(&input.email, None).await?;

        if self
            .uow
            .users()
            .find_teacher_profile_by_teacher_id(&input.teacher_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Teacher ID already exists"));
        }

        self.uow
            .catalog()
            .find_department(input.department_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let user = Self::build_user(input.email, &input.password, input.name, Role::Teacher)?;
        let profile = TeacherProfile {
            id: Uuid::new_v4(),
            user_id: user.id,
            teacher_id: input.teacher_id,
            department_id: input.department_id,
        };

        let (created_user, created_profile) = (user.clone(), profile.clone());
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.users().insert_user(&user).await?;
                    ctx.users().insert_teacher_profile(&profile).await?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!(user = %created_user.id, "Teacher account provisioned");
        Ok(TeacherResponse::new(created_user, created_profile))
    }

    async fn list_teachers(&self) -> AppResult<Vec<TeacherResponse>> {
        let users = self.uow.users().list_by_role(Role::Teacher).await?;

        let mut teachers = Vec::with_capacity(users.len());
        for user in users {
            // A teacher without a profile row would violate the creation
            // invariant; skip rather than fail the whole listing.
            match self.uow.users().find_teacher_profile_by_user(user.id).await? {
                Some(profile) => teachers.push(TeacherResponse::new(user, profile)),
                None => tracing::warn!(user = %user.id, "Teacher user without profile"),
            }
        }

        Ok(teachers)
    }

    async fn get_teacher(&self, user_id: Uuid) -> AppResult<TeacherResponse> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .filter(|u| u.role == Role::Teacher)
            .ok_or(AppError::NotFound)?;
        let profile = self
            .uow
            .users()
            .find_teacher_profile_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(TeacherResponse::new(user, profile))
    }

    async fn update_teacher(
        &self,
        user_id: Uuid,
        update: TeacherUpdate,
    ) -> AppResult<TeacherResponse> {
        let current = self.get_teacher(user_id).await?;

        if let Some(ref email) = update.email {
            self.check_email_free(email, Some(user_id)).await?;
        }
        if let Some(department_id) = update.department_id {
            self.uow
                .catalog()
                .find_department(department_id)
                .await?
                .ok_or(AppError::NotFound)?;
        }

        let user = self
            .uow
            .users()
            .update_user(user_id, update.name, update.email)
            .await?;

        let profile = self
            .uow
            .users()
            .find_teacher_profile_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let profile = if update.department_id.is_some() {
            self.uow
                .users()
                .update_teacher_profile(profile.id, update.department_id)
                .await?
        } else {
            profile
        };

        tracing::debug!(user = %current.id, "Teacher account updated");
        Ok(TeacherResponse::new(user, profile))
    }

    async fn delete_teacher(&self, user_id: Uuid) -> AppResult<()> {
        let teacher = self.get_teacher(user_id).await?;

        let profile = self
            .uow
            .users()
            .find_teacher_profile_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let assigned = self
            .uow
            .catalog()
            .count_assignments_for_teacher(profile.id)
            .await?;
        if assigned > 0 {
            return Err(AppError::conflict("Teacher has assigned classes"));
        }

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move { ctx.users().delete_user_with_profiles(user_id).await })
            })
            .await?;

        tracing::info!(user = %teacher.id, "Teacher account deleted");
        Ok(())
    }

    async fn create_student(&self, input: NewStudent) -> AppResult<StudentResponse> {
        self.check_email_free(&input.email, None).await?;

        if self
            .uow
            .users()
            .find_student_profile_by_student_id(&input.student_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Student ID already exists"));
        }

        self.uow
            .catalog()
            .find_course(input.course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let user = Self::build_user(input.email, &input.password, input.name, Role::Student)?;
        let profile = StudentProfile {
            id: Uuid::new_v4(),
            user_id: user.id,
            student_id: input.student_id,
            course_id: input.course_id,
            year: input.year,
            semester: input.semester,
        };

        let (created_user, created_profile) = (user.clone(), profile.clone());
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.users().insert_user(&user).await?;
                    ctx.users().insert_student_profile(&profile).await?;
                    Ok(())
                })
            })
            .await?;

        tracing::info!(user = %created_user.id, "Student account provisioned");
        Ok(StudentResponse::new(created_user, created_profile))
    }

    async fn list_students(&self) -> AppResult<Vec<StudentResponse>> {
        let users = self.uow.users().list_by_role(Role::Student).await?;

        let mut students = Vec::with_capacity(users.len());
        for user in users {
            match self.uow.users().find_student_profile_by_user(user.id).await? {
                Some(profile) => students.push(StudentResponse::new(user, profile)),
                None => tracing::warn!(user = %user.id, "Student user without profile"),
            }
        }

        Ok(students)
    }

    async fn get_student(&self, user_id: Uuid) -> AppResult<StudentResponse> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .filter(|u| u.role == Role::Student)
            .ok_or(AppError::NotFound)?;
        let profile = self
            .uow
            .users()
            .find_student_profile_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(StudentResponse::new(user, profile))
    }

    async fn update_student(
        &self,
        user_id: Uuid,
        update: StudentUpdate,
    ) -> AppResult<StudentResponse> {
        self.get_student(user_id).await?;

        if let Some(ref email) = update.email {
            self.check_email_free(email, Some(user_id)).await?;
        }
        if let Some(course_id) = update.course_id {
            self.uow
                .catalog()
                .find_course(course_id)
                .await?
                .ok_or(AppError::NotFound)?;
        }

        let user = self
            .uow
            .users()
            .update_user(user_id, update.name, update.email)
            .await?;

        let profile = self
            .uow
            .users()
            .find_student_profile_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let profile = if update.course_id.is_some()
            || update.year.is_some()
            || update.semester.is_some()
        {
            self.uow
                .users()
                .update_student_profile(profile.id, update.course_id, update.year, update.semester)
                .await?
        } else {
            profile
        };

        Ok(StudentResponse::new(user, profile))
    }

    async fn delete_student(&self, user_id: Uuid) -> AppResult<()> {
        let student = self.get_student(user_id).await?;

        let profile = self
            .uow
            .users()
            .find_student_profile_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let enrolled = self.uow.enrollments().count_for_student(profile.id).await?;
        if enrolled > 0 {
            return Err(AppError::conflict("Student has enrollments"));
        }

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move { ctx.users().delete_user_with_profiles(user_id).await })
            })
            .await?;

        tracing::info!(user = %student.id, "Student account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockCatalogRepository, MockUserRepository};
    use crate::services::test_support::TestUow;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "taken@example.edu".to_string(),
            password_hash: "hashed".to_string(),
            name: "Existing".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn teacher_profile(user_id: Uuid) -> TeacherProfile {
        TeacherProfile {
            id: Uuid::new_v4(),
            user_id,
            teacher_id: "T-2041".to_string(),
            department_id: Uuid::new_v4(),
        }
    }

    fn new_teacher() -> NewTeacher {
        NewTeacher {
            email: "taken@example.edu".to_string(),
            password: "SecurePass123".to_string(),
            name: "Ada Lovelace".to_string(),
            teacher_id: "T-2041".to_string(),
            department_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_create_teacher_duplicate_email_is_conflict() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user(Role::Student))));

        let uow = Arc::new(TestUow {
            users: Arc::new(users),
            ..Default::default()
        });
        let result = Registrar::new(uow).create_teacher(new_teacher()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_teacher_duplicate_natural_key_is_conflict() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users
            .expect_find_teacher_profile_by_teacher_id()
            .returning(|_| Ok(Some(teacher_profile(Uuid::new_v4()))));

        let uow = Arc::new(TestUow {
            users: Arc::new(users),
            ..Default::default()
        });
        let result = Registrar::new(uow).create_teacher(new_teacher()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_teacher_with_classes_is_conflict() {
        let teacher = user(Role::Teacher);
        let teacher_id = teacher.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(teacher.clone())));
        users
            .expect_find_teacher_profile_by_user()
            .returning(|user_id| Ok(Some(teacher_profile(user_id))));

        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_count_assignments_for_teacher()
            .returning(|_| Ok(2));

        let uow = Arc::new(TestUow {
            users: Arc::new(users),
            catalog: Arc::new(catalog),
            ..Default::default()
        });
        let result = Registrar::new(uow).delete_teacher(teacher_id).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_teacher_rejects_other_roles() {
        let student = user(Role::Student);
        let student_id = student.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(student.clone())));

        let uow = Arc::new(TestUow {
            users: Arc::new(users),
            ..Default::default()
        });
        let result = Registrar::new(uow).get_teacher(student_id).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
