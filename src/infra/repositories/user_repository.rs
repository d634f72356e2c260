//! User repository: users plus their role-scoped profiles.
//!
//! Single-row reads and updates live here; user+profile creation and
//! deletion are multi-row mutations and go through the Unit of Work
//! transaction context instead.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{student_profile, teacher_profile, user};
use crate::domain::{Role, StudentProfile, TeacherProfile, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by exact (email, role) pair - the login lookup
    async fn find_by_email_and_role(&self, email: &str, role: Role) -> AppResult<Option<User>>;

    /// Find user by email regardless of role (uniqueness checks)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users holding a given role, newest first
    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>>;

    /// Update a user's mutable fields (role is immutable after creation)
    async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<User>;

    /// Find a teacher profile by its own id
    async fn find_teacher_profile(&self, id: Uuid) -> AppResult<Option<TeacherProfile>>;

    /// Find the teacher profile attached to a user
    async fn find_teacher_profile_by_user(&self, user_id: Uuid)
        -> AppResult<Option<TeacherProfile>>;

    /// Find a teacher profile by its natural key
    async fn find_teacher_profile_by_teacher_id(
        &self,
        teacher_id: &str,
    ) -> AppResult<Option<TeacherProfile>>;

    /// Update a teacher profile's department linkage
    async fn update_teacher_profile(
        &self,
        id: Uuid,
        department_id: Option<Uuid>,
    ) -> AppResult<TeacherProfile>;

    /// Find a student profile by its own id
    async fn find_student_profile(&self, id: Uuid) -> AppResult<Option<StudentProfile>>;

    /// Find the student profile attached to a user
    async fn find_student_profile_by_user(&self, user_id: Uuid)
        -> AppResult<Option<StudentProfile>>;

    /// Find a student profile by its natural key
    async fn find_student_profile_by_student_id(
        &self,
        student_id: &str,
    ) -> AppResult<Option<StudentProfile>>;

    /// Update a student profile's course/year/semester
    async fn update_student_profile(
        &self,
        id: Uuid,
        course_id: Option<Uuid>,
        year: Option<i16>,
        semester: Option<i16>,
    ) -> AppResult<StudentProfile>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_email_and_role(&self, email: &str, role: Role) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Role.eq(role.as_str()))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(User::try_from).transpose()
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(User::try_from).collect()
    }

    async fn update_user(
        &self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> AppResult<User> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = model.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(email) = email {
            active.email = Set(email);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        User::try_from(model)
    }

    async fn find_teacher_profile(&self, id: Uuid) -> AppResult<Option<TeacherProfile>> {
        let result = teacher_profile::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(TeacherProfile::from))
    }

    async fn find_teacher_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<TeacherProfile>> {
        let result = teacher_profile::Entity::find()
            .filter(teacher_profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(TeacherProfile::from))
    }

    async fn find_teacher_profile_by_teacher_id(
        &self,
        teacher_id: &str,
    ) -> AppResult<Option<TeacherProfile>> {
        let result = teacher_profile::Entity::find()
            .filter(teacher_profile::Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(TeacherProfile::from))
    }

    async fn update_teacher_profile(
        &self,
        id: Uuid,
        department_id: Option<Uuid>,
    ) -> AppResult<TeacherProfile> {
        let model = teacher_profile::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: teacher_profile::ActiveModel = model.into();

        if let Some(department_id) = department_id {
            active.department_id = Set(department_id);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(TeacherProfile::from(model))
    }

    async fn find_student_profile(&self, id: Uuid) -> AppResult<Option<StudentProfile>> {
        let result = student_profile::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(StudentProfile::from))
    }

    async fn find_student_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<StudentProfile>> {
        let result = student_profile::Entity::find()
            .filter(student_profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(StudentProfile::from))
    }

    async fn find_student_profile_by_student_id(
        &self,
        student_id: &str,
    ) -> AppResult<Option<StudentProfile>> {
        let result = student_profile::Entity::find()
            .filter(student_profile::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(StudentProfile::from))
    }

    async fn update_student_profile(
        &self,
        id: Uuid,
        course_id: Option<Uuid>,
        year: Option<i16>,
        semester: Option<i16>,
    ) -> AppResult<StudentProfile> {
        let model = student_profile::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: student_profile::ActiveModel = model.into();

        if let Some(course_id) = course_id {
            active.course_id = Set(course_id);
        }
        if let Some(year) = year {
            active.year = Set(year);
        }
        if let Some(semester) = semester {
            active.semester = Set(semester);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(StudentProfile::from(model))
    }
}
