//! Teacher-subject assignment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::ClassAssignment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_subjects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teacher_profile_id: Uuid,
    pub subject_id: Uuid,
    #[sea_orm(unique)]
    pub class_code: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ClassAssignment {
    fn from(model: Model) -> Self {
        ClassAssignment {
            id: model.id,
            teacher_profile_id: model.teacher_profile_id,
            subject_id: model.subject_id,
            class_code: model.class_code,
            created_at: model.created_at,
        }
    }
}
