//! Catalog repository: departments, courses, subjects and class assignments.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{course, department, subject, teacher_profile, teacher_subject, user};
use crate::domain::{AssignedTeacher, ClassAssignment, Course, Department, Subject};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Catalog repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    // Departments
    async fn insert_department(&self, department: Department) -> AppResult<Department>;
    async fn find_department(&self, id: Uuid) -> AppResult<Option<Department>>;
    async fn find_department_by_code(&self, code: &str) -> AppResult<Option<Department>>;
    async fn list_departments(&self) -> AppResult<Vec<Department>>;
    async fn update_department(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
    ) -> AppResult<Department>;
    async fn delete_department(&self, id: Uuid) -> AppResult<()>;
    async fn count_courses_in_department(&self, id: Uuid) -> AppResult<u64>;
    async fn count_teachers_in_department(&self, id: Uuid) -> AppResult<u64>;

    // Courses
    async fn insert_course(&self, course: Course) -> AppResult<Course>;
    async fn find_course(&self, id: Uuid) -> AppResult<Option<Course>>;
    async fn find_course_by_code(&self, code: &str) -> AppResult<Option<Course>>;
    async fn list_courses(&self, department_id: Option<Uuid>) -> AppResult<Vec<Course>>;
    async fn update_course(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
        department_id: Option<Uuid>,
    ) -> AppResult<Course>;
    async fn delete_course(&self, id: Uuid) -> AppResult<()>;
    async fn count_subjects_in_course(&self, id: Uuid) -> AppResult<u64>;
    async fn count_students_in_course(&self, id: Uuid) -> AppResult<u64>;

    // Subjects
    async fn insert_subject(&self, subject: Subject) -> AppResult<Subject>;
    async fn find_subject(&self, id: Uuid) -> AppResult<Option<Subject>>;
    async fn find_subject_by_code(&self, course_id: Uuid, code: &str)
        -> AppResult<Option<Subject>>;
    async fn list_subjects(&self, course_id: Option<Uuid>) -> AppResult<Vec<Subject>>;
    async fn list_subjects_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Subject>>;
    async fn update_subject(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
    ) -> AppResult<Subject>;
    async fn delete_subject(&self, id: Uuid) -> AppResult<()>;

    // Class assignments
    async fn insert_assignment(&self, assignment: ClassAssignment) -> AppResult<ClassAssignment>;
    async fn find_assignment_by_pair(
        &self,
        teacher_profile_id: Uuid,
        subject_id: Uuid,
    ) -> AppResult<Option<ClassAssignment>>;
    async fn delete_assignment(&self, id: Uuid) -> AppResult<()>;
    async fn list_assignments_for_teacher(
        &self,
        teacher_profile_id: Uuid,
    ) -> AppResult<Vec<ClassAssignment>>;
    async fn list_teachers_for_subject(&self, subject_id: Uuid)
        -> AppResult<Vec<AssignedTeacher>>;
    async fn count_assignments_for_teacher(&self, teacher_profile_id: Uuid) -> AppResult<u64>;
    async fn count_assignments_for_subject(&self, subject_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of CatalogRepository
pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn insert_department(&self, dept: Department) -> AppResult<Department> {
        let active = department::ActiveModel {
            id: Set(dept.id),
            code: Set(dept.code),
            name: Set(dept.name),
            created_at: Set(dept.created_at),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Department::from(model))
    }

    async fn find_department(&self, id: Uuid) -> AppResult<Option<Department>> {
        let result = department::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Department::from))
    }

    async fn find_department_by_code(&self, code: &str) -> AppResult<Option<Department>> {
        let result = department::Entity::find()
            .filter(department::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Department::from))
    }

    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        let models = department::Entity::find()
            .order_by_asc(department::Column::Code)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Department::from).collect())
    }

    async fn update_department(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
    ) -> AppResult<Department> {
        let model = department::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: department::ActiveModel = model.into();

        if let Some(code) = code {
            active.code = Set(code);
        }
        if let Some(name) = name {
            active.name = Set(name);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Department::from(model))
    }

    async fn delete_department(&self, id: Uuid) -> AppResult<()> {
        let result = department::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count_courses_in_department(&self, id: Uuid) -> AppResult<u64> {
        course::Entity::find()
            .filter(course::Column::DepartmentId.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_teachers_in_department(&self, id: Uuid) -> AppResult<u64> {
        teacher_profile::Entity::find()
            .filter(teacher_profile::Column::DepartmentId.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn insert_course(&self, course: Course) -> AppResult<Course> {
        let active = course::ActiveModel {
            id: Set(course.id),
            code: Set(course.code),
            name: Set(course.name),
            department_id: Set(course.department_id),
            created_at: Set(course.created_at),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Course::from(model))
    }

    async fn find_course(&self, id: Uuid) -> AppResult<Option<Course>> {
        let result = course::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Course::from))
    }

    async fn find_course_by_code(&self, code: &str) -> AppResult<Option<Course>> {
        let result = course::Entity::find()
            .filter(course::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Course::from))
    }

    async fn list_courses(&self, department_id: Option<Uuid>) -> AppResult<Vec<Course>> {
        let mut query = course::Entity::find().order_by_asc(course::Column::Code);

        if let Some(department_id) = department_id {
            query = query.filter(course::Column::DepartmentId.eq(department_id));
        }

        let models = query.all(&self.db).await.map_err(AppError::from)?;
        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn update_course(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
        department_id: Option<Uuid>,
    ) -> AppResult<Course> {
        let model = course::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: course::ActiveModel = model.into();

        if let Some(code) = code {
            active.code = Set(code);
        }
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(department_id) = department_id {
            active.department_id = Set(department_id);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Course::from(model))
    }

    async fn delete_course(&self, id: Uuid) -> AppResult<()> {
        let result = course::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count_subjects_in_course(&self, id: Uuid) -> AppResult<u64> {
        subject::Entity::find()
            .filter(subject::Column::CourseId.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_students_in_course(&self, id: Uuid) -> AppResult<u64> {
        use super::entities::student_profile;

        student_profile::Entity::find()
            .filter(student_profile::Column::CourseId.eq(id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn insert_subject(&self, subj: Subject) -> AppResult<Subject> {
        let active = subject::ActiveModel {
            id: Set(subj.id),
            code: Set(subj.code),
            name: Set(subj.name),
            course_id: Set(subj.course_id),
            created_at: Set(subj.created_at),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Subject::from(model))
    }

    async fn find_subject(&self, id: Uuid) -> AppResult<Option<Subject>> {
        let result = subject::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Subject::from))
    }

    async fn find_subject_by_code(
        &self,
        course_id: Uuid,
        code: &str,
    ) -> AppResult<Option<Subject>> {
        let result = subject::Entity::find()
            .filter(subject::Column::CourseId.eq(course_id))
            .filter(subject::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Subject::from))
    }

    async fn list_subjects(&self, course_id: Option<Uuid>) -> AppResult<Vec<Subject>> {
        let mut query = subject::Entity::find().order_by_asc(subject::Column::Code);

        if let Some(course_id) = course_id {
            query = query.filter(subject::Column::CourseId.eq(course_id));
        }

        let models = query.all(&self.db).await.map_err(AppError::from)?;
        Ok(models.into_iter().map(Subject::from).collect())
    }

    async fn list_subjects_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Subject>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = subject::Entity::find()
            .filter(subject::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Subject::from).collect())
    }

    async fn update_subject(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
    ) -> AppResult<Subject> {
        let model = subject::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: subject::ActiveModel = model.into();

        if let Some(code) = code {
            active.code = Set(code);
        }
        if let Some(name) = name {
            active.name = Set(name);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Subject::from(model))
    }

    async fn delete_subject(&self, id: Uuid) -> AppResult<()> {
        let result = subject::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn insert_assignment(&self, assignment: ClassAssignment) -> AppResult<ClassAssignment> {
        let active = teacher_subject::ActiveModel {
            id: Set(assignment.id),
            teacher_profile_id: Set(assignment.teacher_profile_id),
            subject_id: Set(assignment.subject_id),
            class_code: Set(assignment.class_code),
            created_at: Set(assignment.created_at),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(ClassAssignment::from(model))
    }

    async fn find_assignment_by_pair(
        &self,
        teacher_profile_id: Uuid,
        subject_id: Uuid,
    ) -> AppResult<Option<ClassAssignment>> {
        let result = teacher_subject::Entity::find()
            .filter(teacher_subject::Column::TeacherProfileId.eq(teacher_profile_id))
            .filter(teacher_subject::Column::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(ClassAssignment::from))
    }

    async fn delete_assignment(&self, id: Uuid) -> AppResult<()> {
        let result = teacher_subject::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_assignments_for_teacher(
        &self,
        teacher_profile_id: Uuid,
    ) -> AppResult<Vec<ClassAssignment>> {
        let models = teacher_subject::Entity::find()
            .filter(teacher_subject::Column::TeacherProfileId.eq(teacher_profile_id))
            .order_by_asc(teacher_subject::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(ClassAssignment::from).collect())
    }

    async fn list_teachers_for_subject(
        &self,
        subject_id: Uuid,
    ) -> AppResult<Vec<AssignedTeacher>> {
        let assignments = teacher_subject::Entity::find()
            .filter(teacher_subject::Column::SubjectId.eq(subject_id))
            .order_by_asc(teacher_subject::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let profile_ids: Vec<Uuid> = assignments.iter().map(|a| a.teacher_profile_id).collect();
        let profiles: HashMap<Uuid, teacher_profile::Model> = teacher_profile::Entity::find()
            .filter(teacher_profile::Column::Id.is_in(profile_ids))
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

        let mut teachers = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let Some(profile) = profiles.get(&assignment.teacher_profile_id) else {
                continue;
            };
            let Some(user) = users.get(&profile.user_id) else {
                continue;
            };
            teachers.push(AssignedTeacher {
                teacher_profile_id: profile.id,
                teacher_id: profile.teacher_id.clone(),
                name: user.name.clone(),
                class_code: assignment.class_code,
            });
        }

        Ok(teachers)
    }

    async fn count_assignments_for_teacher(&self, teacher_profile_id: Uuid) -> AppResult<u64> {
        teacher_subject::Entity::find()
            .filter(teacher_subject::Column::TeacherProfileId.eq(teacher_profile_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_assignments_for_subject(&self, subject_id: Uuid) -> AppResult<u64> {
        teacher_subject::Entity::find()
            .filter(teacher_subject::Column::SubjectId.eq(subject_id))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
