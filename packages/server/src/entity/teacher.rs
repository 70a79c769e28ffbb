use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Default weekly teaching load for new teachers.
pub const DEFAULT_MAX_WEEKLY_HOURS: i32 = 40;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teacher")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Login identity, at most one teacher per user.
    #[sea_orm(unique)]
    pub user_id: Option<i32>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: Option<super::user::Entity>,

    #[sea_orm(unique)]
    pub code: String,
    pub first_names: String,
    pub last_names: String,
    pub national_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contract_type: Option<String>,

    #[sea_orm(default_value = 40)]
    pub max_weekly_hours: i32,

    pub primary_unit_id: Option<i32>,
    #[sea_orm(belongs_to, from = "primary_unit_id", to = "id")]
    pub primary_unit: Option<super::academic_unit::Entity>,

    #[sea_orm(has_many, via = "teacher_specialty")]
    pub specialties: HasMany<super::specialty::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
