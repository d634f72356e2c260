//! Department database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Department;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Department {
    fn from(model: Model) -> Self {
        Department {
            id: model.id,
            code: model.code,
            name: model.name,
            created_at: model.created_at,
        }
    }
}
