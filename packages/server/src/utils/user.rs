use std::collections::HashMap;

use sea_orm::*;

use crate::entity::{group, teacher, user_group};
use crate::models::auth::TeacherClaims;
use crate::models::user::GroupResponse;

/// Groups of each given user, ordered by group ID.
pub async fn groups_by_user<C: ConnectionTrait>(
    db: &C,
    user_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<GroupResponse>>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let memberships = user_group::Entity::find()
        .filter(user_group::Column::UserId.is_in(user_ids))
        .all(db)
        .await?;
    if memberships.is_empty() {
        return Ok(HashMap::new());
    }

    let groups: HashMap<i32, group::Model> = group::Entity::find()
        .filter(group::Column::Id.is_in(memberships.iter().map(|m| m.group_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();

    let mut by_user: HashMap<i32, Vec<GroupResponse>> = HashMap::new();
    for m in memberships {
        if let Some(g) = groups.get(&m.group_id) {
            by_user
                .entry(m.user_id)
                .or_default()
                .push(g.clone().into());
        }
    }
    for list in by_user.values_mut() {
        list.sort_by_key(|g| g.id);
    }
    Ok(by_user)
}

pub async fn user_groups<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<GroupResponse>, DbErr> {
    Ok(groups_by_user(db, vec![user_id])
        .await?
        .remove(&user_id)
        .unwrap_or_default())
}

/// Teacher attributes for a user, or `None` when no teacher profile is linked.
pub async fn teacher_claims<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<TeacherClaims>, DbErr> {
    Ok(teacher::Entity::find()
        .filter(teacher::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .map(|t| TeacherClaims {
            docente_id: t.id,
            codigo_docente: t.code,
        }))
}
