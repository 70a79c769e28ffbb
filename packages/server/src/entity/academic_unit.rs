use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Department or faculty a teacher primarily belongs to.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "academic_unit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(has_many)]
    pub teachers: HasMany<super::teacher::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
