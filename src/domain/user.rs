//! User domain entity, roles and role-scoped profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_STUDENT, ROLE_TEACHER};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Path prefix guarded for this role (e.g. `/admin`)
    pub fn path_prefix(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Teacher => "/teacher",
            Role::Student => "/student",
        }
    }

    /// Login page for this role's portal (e.g. `/admin/login`)
    pub fn login_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/login",
            Role::Teacher => "/teacher/login",
            Role::Student => "/student/login",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Teacher => ROLE_TEACHER,
            Role::Student => ROLE_STUDENT,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_TEACHER => Ok(Role::Teacher),
            ROLE_STUDENT => Ok(Role::Student),
            other => Err(AppError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity.
///
/// Role is immutable after creation; exactly one role profile row
/// accompanies every user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Admin profile (1:1 extension of an admin User)
#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// Teacher profile (1:1 extension of a teacher User)
#[derive(Debug, Clone, Serialize)]
pub struct TeacherProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Natural key, globally unique (e.g. "T-2041")
    pub teacher_id: String,
    pub department_id: Uuid,
}

/// Student profile (1:1 extension of a student User)
#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Natural key, globally unique (e.g. "S-10771")
    pub student_id: String,
    pub course_id: Uuid,
    pub year: i16,
    pub semester: i16,
}

/// User response (safe to return to client, hash stripped)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "user@example.edu")]
    pub email: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "teacher")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}

/// Teacher response: user fields plus profile attributes
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeacherResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[schema(example = "T-2041")]
    pub teacher_id: String,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TeacherResponse {
    pub fn new(user: User, profile: TeacherProfile) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            teacher_id: profile.teacher_id,
            department_id: profile.department_id,
            created_at: user.created_at,
        }
    }
}

/// Student response: user fields plus profile attributes
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[schema(example = "S-10771")]
    pub student_id: String,
    pub course_id: Uuid,
    #[schema(example = 2)]
    pub year: i16,
    #[schema(example = 1)]
    pub semester: i16,
    pub created_at: DateTime<Utc>,
}

impl StudentResponse {
    pub fn new(user: User, profile: StudentProfile) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            student_id: profile.student_id,
            course_id: profile.course_id,
            year: profile.year,
            semester: profile.semester,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Teacher, Role::Student] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_path_prefixes() {
        assert_eq!(Role::Admin.path_prefix(), "/admin");
        assert_eq!(Role::Student.login_path(), "/student/login");
    }
}
