//! Subject database entity for SeaORM.
//!
//! Subject codes are unique within their course; the composite constraint
//! lives in the migration.

use sea_orm::entity::prelude::*;

use crate::domain::Subject;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub course_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Subject {
    fn from(model: Model) -> Self {
        Subject {
            id: model.id,
            code: model.code,
            name: model.name,
            course_id: model.course_id,
            created_at: model.created_at,
        }
    }
}
