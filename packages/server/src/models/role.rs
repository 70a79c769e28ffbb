use serde::{Deserialize, Serialize};

use super::shared::double_option;
use crate::entity::role;
use crate::error::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RoleResponse {
    #[serde(rename = "rol_id")]
    #[schema(example = 1)]
    pub id: i32,
    #[serde(rename = "nombre_rol")]
    #[schema(example = "Coordinador")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl From<role::Model> for RoleResponse {
    fn from(m: role::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRoleRequest {
    #[serde(rename = "nombre_rol")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateRoleRequest {
    #[serde(rename = "nombre_rol", default)]
    pub name: Option<String>,
    /// Absent: unchanged. `null`: cleared.
    #[serde(rename = "descripcion", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

fn validate_role_name(name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::field("nombre_rol", "Name must be 1-100 characters"));
    }
    Ok(())
}

pub fn validate_create_role(req: &CreateRoleRequest) -> Result<(), AppError> {
    validate_role_name(&req.name)
}

pub fn validate_update_role(req: &UpdateRoleRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_role_name(name)?;
    }
    Ok(())
}
