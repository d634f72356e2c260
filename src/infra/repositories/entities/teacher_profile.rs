//! Teacher profile database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::TeacherProfile;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    /// Natural key (e.g. "T-2041")
    #[sea_orm(unique)]
    pub teacher_id: String,
    pub department_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TeacherProfile {
    fn from(model: Model) -> Self {
        TeacherProfile {
            id: model.id,
            user_id: model.user_id,
            teacher_id: model.teacher_id,
            department_id: model.department_id,
        }
    }
}
