//! File upload database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::FileUpload;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "file_uploads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub storage_key: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FileUpload {
    fn from(model: Model) -> Self {
        FileUpload {
            id: model.id,
            storage_key: model.storage_key,
            file_name: model.file_name,
            size_bytes: model.size_bytes,
            mime_type: model.mime_type,
            uploaded_by: model.uploaded_by,
            created_at: model.created_at,
        }
    }
}
