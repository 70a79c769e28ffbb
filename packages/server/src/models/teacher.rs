use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::shared::{Pagination, double_option};
use super::specialty::SpecialtyResponse;
use crate::error::AppError;

pub const SPECIALTY_IDS_FIELD: &str = "especialidad_ids";
pub const WEEKLY_HOURS_RANGE: RangeInclusive<i32> = 0..=168;

/// Request body for creating a teacher.
///
/// Read-only fields (`docente_id`, `usuario_username`, `unidad_principal_nombre`,
/// `especialidades_detalle`) are ignored if sent.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTeacherRequest {
    /// Linked user account.
    #[serde(rename = "usuario", default)]
    pub user_id: Option<i32>,
    #[serde(rename = "codigo_docente")]
    #[schema(example = "D007")]
    pub code: String,
    #[serde(rename = "nombres")]
    #[schema(example = "Ana María")]
    pub first_names: String,
    #[serde(rename = "apellidos")]
    #[schema(example = "Lopez Quispe")]
    pub last_names: String,
    #[serde(rename = "dni", default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "tipo_contrato", default)]
    #[schema(example = "Tiempo completo")]
    pub contract_type: Option<String>,
    /// Defaults to 40.
    #[serde(rename = "max_horas_semanales", default)]
    pub max_weekly_hours: Option<i32>,
    #[serde(rename = "unidad_principal", default)]
    pub primary_unit_id: Option<i32>,
    /// Specialty IDs; the teacher's set becomes exactly this list.
    #[serde(rename = "especialidad_ids", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<i32>>, example = json!([1, 2]))]
    pub specialty_ids: Option<Option<Vec<i32>>>,
}

/// Partial update. Nullable fields distinguish absent (unchanged) from `null`
/// (cleared). `especialidad_ids: []` clears all specialties.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateTeacherRequest {
    #[serde(rename = "usuario", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub user_id: Option<Option<i32>>,
    #[serde(rename = "codigo_docente", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub code: Option<Option<String>>,
    #[serde(rename = "nombres", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub first_names: Option<Option<String>>,
    #[serde(rename = "apellidos", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub last_names: Option<Option<String>>,
    #[serde(rename = "dni", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub national_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(rename = "telefono", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(rename = "tipo_contrato", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contract_type: Option<Option<String>>,
    #[serde(rename = "max_horas_semanales", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub max_weekly_hours: Option<Option<i32>>,
    #[serde(rename = "unidad_principal", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub primary_unit_id: Option<Option<i32>>,
    #[serde(rename = "especialidad_ids", default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<i32>>)]
    pub specialty_ids: Option<Option<Vec<i32>>>,
}

fn validate_required_text(value: &str, field: &'static str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::field(
            field,
            format!("Must be 1-{max} characters"),
        ));
    }
    Ok(())
}

fn validate_hours(hours: Option<i32>) -> Result<(), AppError> {
    if let Some(hours) = hours
        && !WEEKLY_HOURS_RANGE.contains(&hours)
    {
        return Err(AppError::field(
            "max_horas_semanales",
            "Must be between 0 and 168",
        ));
    }
    Ok(())
}

/// Only nullable columns may be cleared with an explicit `null`.
fn reject_null<T>(value: &Option<Option<T>>, field: &'static str) -> Result<(), AppError> {
    if matches!(value, Some(None)) {
        return Err(AppError::field(field, "This field may not be null."));
    }
    Ok(())
}

pub fn validate_create_teacher(req: &CreateTeacherRequest) -> Result<(), AppError> {
    validate_required_text(&req.code, "codigo_docente", 20)?;
    validate_required_text(&req.first_names, "nombres", 100)?;
    validate_required_text(&req.last_names, "apellidos", 100)?;
    validate_hours(req.max_weekly_hours)?;
    reject_null(&req.specialty_ids, SPECIALTY_IDS_FIELD)
}

pub fn validate_update_teacher(req: &UpdateTeacherRequest) -> Result<(), AppError> {
    reject_null(&req.code, "codigo_docente")?;
    reject_null(&req.first_names, "nombres")?;
    reject_null(&req.last_names, "apellidos")?;
    reject_null(&req.max_weekly_hours, "max_horas_semanales")?;
    reject_null(&req.specialty_ids, SPECIALTY_IDS_FIELD)?;

    if let Some(Some(ref code)) = req.code {
        validate_required_text(code, "codigo_docente", 20)?;
    }
    if let Some(Some(ref first_names)) = req.first_names {
        validate_required_text(first_names, "nombres", 100)?;
    }
    if let Some(Some(ref last_names)) = req.last_names {
        validate_required_text(last_names, "apellidos", 100)?;
    }
    validate_hours(req.max_weekly_hours.flatten())
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeacherResponse {
    #[serde(rename = "docente_id")]
    #[schema(example = 7)]
    pub id: i32,
    #[serde(rename = "usuario")]
    pub user_id: Option<i32>,
    /// Username of the linked account.
    #[serde(rename = "usuario_username")]
    pub username: Option<String>,
    #[serde(rename = "codigo_docente")]
    #[schema(example = "D007")]
    pub code: String,
    #[serde(rename = "nombres")]
    pub first_names: String,
    #[serde(rename = "apellidos")]
    pub last_names: String,
    #[serde(rename = "dni")]
    pub national_id: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "tipo_contrato")]
    pub contract_type: Option<String>,
    #[serde(rename = "max_horas_semanales")]
    #[schema(example = 40)]
    pub max_weekly_hours: i32,
    #[serde(rename = "unidad_principal")]
    pub primary_unit_id: Option<i32>,
    /// Name of the primary academic unit.
    #[serde(rename = "unidad_principal_nombre")]
    pub primary_unit_name: Option<String>,
    #[serde(rename = "especialidades_detalle")]
    pub specialties: Vec<SpecialtyResponse>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct TeacherListQuery {
    /// Page number (1-based, default 1).
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    pub per_page: Option<u64>,
    /// Case-insensitive match on code, names or last names.
    pub search: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeacherListResponse {
    pub data: Vec<TeacherResponse>,
    pub pagination: Pagination,
}
