use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string. Never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,

    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,

    #[sea_orm(has_many, via = "user_group")]
    pub groups: HasMany<super::group::Entity>,

    #[sea_orm(has_one)]
    pub teacher: HasOne<super::teacher::Entity>,

    pub date_joined: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
