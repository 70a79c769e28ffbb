use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "specialty")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,

    #[sea_orm(has_many, via = "teacher_specialty")]
    pub teachers: HasMany<super::teacher::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
