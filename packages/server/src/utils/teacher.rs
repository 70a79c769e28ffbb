use std::collections::{BTreeSet, HashMap, HashSet};

use sea_orm::*;

use crate::entity::{academic_unit, specialty, teacher, teacher_specialty, user};
use crate::error::AppError;
use crate::models::specialty::SpecialtyResponse;
use crate::models::teacher::{SPECIALTY_IDS_FIELD, TeacherResponse};

/// Rows to insert and delete to turn one association set into another.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SetDiff {
    pub to_add: Vec<i32>,
    pub to_remove: Vec<i32>,
}

impl SetDiff {
    pub fn between(current: &BTreeSet<i32>, wanted: &BTreeSet<i32>) -> Self {
        Self {
            to_add: wanted.difference(current).copied().collect(),
            to_remove: current.difference(wanted).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

fn invalid_pk(field: &'static str, id: i32) -> AppError {
    AppError::field(field, format!("Invalid pk \"{id}\" - object does not exist."))
}

/// Resolve specialty IDs, failing on the first one that does not exist.
/// Duplicates collapse.
pub async fn resolve_specialties<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<BTreeSet<i32>, AppError> {
    let wanted: BTreeSet<i32> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(wanted);
    }

    let found: HashSet<i32> = specialty::Entity::find()
        .filter(specialty::Column::Id.is_in(wanted.iter().copied()))
        .select_only()
        .column(specialty::Column::Id)
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    if let Some(&missing) = ids.iter().find(|id| !found.contains(*id)) {
        return Err(invalid_pk(SPECIALTY_IDS_FIELD, missing));
    }
    Ok(wanted)
}

/// Ensure a referenced user exists.
pub async fn resolve_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<(), AppError> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| invalid_pk("usuario", user_id))
}

/// Ensure a referenced academic unit exists.
pub async fn resolve_unit<C: ConnectionTrait>(db: &C, unit_id: i32) -> Result<(), AppError> {
    academic_unit::Entity::find_by_id(unit_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| invalid_pk("unidad_principal", unit_id))
}

pub async fn current_specialty_ids<C: ConnectionTrait>(
    db: &C,
    teacher_id: i32,
) -> Result<BTreeSet<i32>, DbErr> {
    Ok(teacher_specialty::Entity::find()
        .filter(teacher_specialty::Column::TeacherId.eq(teacher_id))
        .select_only()
        .column(teacher_specialty::Column::SpecialtyId)
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect())
}

/// Make the teacher's specialty set exactly `wanted`. Rows already in place
/// are left alone, so replacing a set with itself writes nothing.
pub async fn replace_specialties<C: ConnectionTrait>(
    db: &C,
    teacher_id: i32,
    wanted: &BTreeSet<i32>,
) -> Result<SetDiff, DbErr> {
    let current = current_specialty_ids(db, teacher_id).await?;
    let diff = SetDiff::between(&current, wanted);

    if !diff.to_remove.is_empty() {
        teacher_specialty::Entity::delete_many()
            .filter(teacher_specialty::Column::TeacherId.eq(teacher_id))
            .filter(teacher_specialty::Column::SpecialtyId.is_in(diff.to_remove.clone()))
            .exec(db)
            .await?;
    }

    if !diff.to_add.is_empty() {
        let rows = diff
            .to_add
            .iter()
            .map(|&specialty_id| teacher_specialty::ActiveModel {
                teacher_id: Set(teacher_id),
                specialty_id: Set(specialty_id),
            });
        teacher_specialty::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await?;
    }

    if !diff.is_empty() {
        tracing::debug!(
            teacher_id,
            added = diff.to_add.len(),
            removed = diff.to_remove.len(),
            "Replaced teacher specialties"
        );
    }
    Ok(diff)
}

/// Build responses for a batch of teachers, filling in the derived read-only
/// fields with one query per related table.
pub async fn teacher_responses<C: ConnectionTrait>(
    db: &C,
    teachers: Vec<teacher::Model>,
) -> Result<Vec<TeacherResponse>, DbErr> {
    if teachers.is_empty() {
        return Ok(Vec::new());
    }

    let teacher_ids: Vec<i32> = teachers.iter().map(|t| t.id).collect();
    let user_ids: Vec<i32> = teachers.iter().filter_map(|t| t.user_id).collect();
    let unit_ids: Vec<i32> = teachers.iter().filter_map(|t| t.primary_unit_id).collect();

    let usernames: HashMap<i32, String> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Username)
            .into_tuple::<(i32, String)>()
            .all(db)
            .await?
            .into_iter()
            .collect()
    };

    let unit_names: HashMap<i32, String> = if unit_ids.is_empty() {
        HashMap::new()
    } else {
        academic_unit::Entity::find()
            .filter(academic_unit::Column::Id.is_in(unit_ids))
            .select_only()
            .column(academic_unit::Column::Id)
            .column(academic_unit::Column::Name)
            .into_tuple::<(i32, String)>()
            .all(db)
            .await?
            .into_iter()
            .collect()
    };

    let links = teacher_specialty::Entity::find()
        .filter(teacher_specialty::Column::TeacherId.is_in(teacher_ids))
        .all(db)
        .await?;
    let specialty_ids: BTreeSet<i32> = links.iter().map(|l| l.specialty_id).collect();
    let specialties: HashMap<i32, specialty::Model> = if specialty_ids.is_empty() {
        HashMap::new()
    } else {
        specialty::Entity::find()
            .filter(specialty::Column::Id.is_in(specialty_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    };

    let mut by_teacher: HashMap<i32, Vec<SpecialtyResponse>> = HashMap::new();
    for link in links {
        if let Some(s) = specialties.get(&link.specialty_id) {
            by_teacher
                .entry(link.teacher_id)
                .or_default()
                .push(s.clone().into());
        }
    }

    Ok(teachers
        .into_iter()
        .map(|t| {
            let mut details = by_teacher.remove(&t.id).unwrap_or_default();
            details.sort_by_key(|s| s.id);
            TeacherResponse {
                id: t.id,
                username: t.user_id.and_then(|id| usernames.get(&id).cloned()),
                user_id: t.user_id,
                code: t.code,
                first_names: t.first_names,
                last_names: t.last_names,
                national_id: t.national_id,
                email: t.email,
                phone: t.phone,
                contract_type: t.contract_type,
                max_weekly_hours: t.max_weekly_hours,
                primary_unit_name: t
                    .primary_unit_id
                    .and_then(|id| unit_names.get(&id).cloned()),
                primary_unit_id: t.primary_unit_id,
                specialties: details,
            }
        })
        .collect())
}

pub async fn teacher_response<C: ConnectionTrait>(
    db: &C,
    teacher: teacher::Model,
) -> Result<TeacherResponse, AppError> {
    teacher_responses(db, vec![teacher])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Teacher response was not built".into()))
}
