//! User database entity for SeaORM.

use std::str::FromStr;

use sea_orm::entity::prelude::*;

use crate::domain::{Role, User};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
/// Fails if the stored role string is not one of the known roles.
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            role: Role::from_str(&model.role)
                .map_err(|_| AppError::internal(format!("Unknown stored role: {}", model.role)))?,
            created_at: model.created_at,
        })
    }
}
