//! Enrollment domain entity: the Student <-> Subject join.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One student's membership in one subject.
///
/// At most one row exists per (student, subject); the unique constraint
/// backs the reconcile semantics of the enrollment service.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_profile_id: Uuid,
    pub subject_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

/// Enrollment read model with subject context for portal listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub student_profile_id: Uuid,
    pub subject_id: Uuid,
    #[schema(example = "CS101")]
    pub subject_code: String,
    pub subject_name: String,
    pub enrolled_at: DateTime<Utc>,
}
