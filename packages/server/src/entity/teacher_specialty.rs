use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teacher_specialty")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub teacher_id: i32,
    #[sea_orm(primary_key)]
    pub specialty_id: i32,
    #[sea_orm(belongs_to, from = "teacher_id", to = "id")]
    pub teacher: Option<super::teacher::Entity>,
    #[sea_orm(belongs_to, from = "specialty_id", to = "id")]
    pub specialty: Option<super::specialty::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
