//! Subject file database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::SubjectFile;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subject_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub file_upload_id: Uuid,
    pub subject_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SubjectFile {
    fn from(model: Model) -> Self {
        SubjectFile {
            id: model.id,
            file_upload_id: model.file_upload_id,
            subject_id: model.subject_id,
            title: model.title,
            description: model.description,
        }
    }
}
