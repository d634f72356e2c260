//! Catalog domain entities: the Department -> Course -> Subject hierarchy
//! and teacher class assignments.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Department, the hierarchy root. Code is globally unique.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Department {
    pub id: Uuid,
    #[schema(example = "CS")]
    pub code: String,
    #[schema(example = "Computer Science")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Course, child of exactly one Department. Code is globally unique.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Course {
    pub id: Uuid,
    #[schema(example = "CS-BSC")]
    pub code: String,
    #[schema(example = "BSc Computer Science")]
    pub name: String,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Subject, child of exactly one Course. Code is unique within its course.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Subject {
    pub id: Uuid,
    #[schema(example = "CS101")]
    pub code: String,
    #[schema(example = "Introduction to Programming")]
    pub name: String,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A teacher's class assignment to a subject, with its generated class code.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassAssignment {
    pub id: Uuid,
    pub teacher_profile_id: Uuid,
    pub subject_id: Uuid,
    #[schema(example = "CS101-4F2A9C")]
    pub class_code: String,
    pub created_at: DateTime<Utc>,
}

/// Teacher as seen from a subject read path.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignedTeacher {
    pub teacher_profile_id: Uuid,
    #[schema(example = "T-2041")]
    pub teacher_id: String,
    pub name: String,
    pub class_code: String,
}

/// Subject read model.
///
/// `primary_instructor` is defined only when exactly one assignment exists;
/// with several assigned teachers it is `None` rather than whichever row a
/// query happened to return first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub course_id: Uuid,
    pub teachers: Vec<AssignedTeacher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_instructor: Option<AssignedTeacher>,
    pub created_at: DateTime<Utc>,
}

impl SubjectResponse {
    pub fn new(subject: Subject, teachers: Vec<AssignedTeacher>) -> Self {
        let primary_instructor = match teachers.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };
        Self {
            id: subject.id,
            code: subject.code,
            name: subject.name,
            course_id: subject.course_id,
            teachers,
            primary_instructor,
            created_at: subject.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Subject {
        Subject {
            id: Uuid::new_v4(),
            code: "CS101".to_string(),
            name: "Intro".to_string(),
            course_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn teacher(name: &str) -> AssignedTeacher {
        AssignedTeacher {
            teacher_profile_id: Uuid::new_v4(),
            teacher_id: format!("T-{}", name.len()),
            name: name.to_string(),
            class_code: "CS101-AB12".to_string(),
        }
    }

    #[test]
    fn test_single_teacher_is_primary() {
        let response = SubjectResponse::new(subject(), vec![teacher("Ada")]);
        assert_eq!(response.primary_instructor.unwrap().name, "Ada");
    }

    #[test]
    fn test_multiple_teachers_leave_primary_undefined() {
        let response = SubjectResponse::new(subject(), vec![teacher("Ada"), teacher("Grace")]);
        assert!(response.primary_instructor.is_none());
        assert_eq!(response.teachers.len(), 2);
    }

    #[test]
    fn test_no_teachers_no_primary() {
        let response = SubjectResponse::new(subject(), vec![]);
        assert!(response.primary_instructor.is_none());
    }
}
