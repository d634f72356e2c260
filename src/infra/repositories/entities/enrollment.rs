//! Enrollment database entity for SeaORM.
//!
//! The (student_profile_id, subject_id) pair is unique; the composite
//! constraint lives in the migration.

use sea_orm::entity::prelude::*;

use crate::domain::Enrollment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_profile_id: Uuid,
    pub subject_id: Uuid,
    pub enrolled_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Enrollment {
    fn from(model: Model) -> Self {
        Enrollment {
            id: model.id,
            student_profile_id: model.student_profile_id,
            subject_id: model.subject_id,
            enrolled_at: model.enrolled_at,
        }
    }
}
