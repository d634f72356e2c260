//! Student profile database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::StudentProfile;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "student_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    /// Natural key (e.g. "S-10771")
    #[sea_orm(unique)]
    pub student_id: String,
    pub course_id: Uuid,
    pub year: i16,
    pub semester: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StudentProfile {
    fn from(model: Model) -> Self {
        StudentProfile {
            id: model.id,
            user_id: model.user_id,
            student_id: model.student_id,
            course_id: model.course_id,
            year: model.year,
            semester: model.semester,
        }
    }
}
