use serde::{Deserialize, Serialize};

use crate::entity::specialty;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct SpecialtyResponse {
    #[serde(rename = "especialidad_id")]
    #[schema(example = 1)]
    pub id: i32,
    #[serde(rename = "nombre_especialidad")]
    #[schema(example = "Matemáticas")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

impl From<specialty::Model> for SpecialtyResponse {
    fn from(m: specialty::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSpecialtyRequest {
    #[serde(rename = "nombre_especialidad")]
    #[schema(example = "Matemáticas")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

pub fn validate_create_specialty(req: &CreateSpecialtyRequest) -> Result<(), AppError> {
    let name = req.name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::field(
            "nombre_especialidad",
            "Name must be 1-100 characters",
        ));
    }
    Ok(())
}
