use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::entity::{group, user};

/// A group the user belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct GroupResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Coordinadores")]
    pub name: String,
}

impl From<group::Model> for GroupResponse {
    fn from(g: group::Model) -> Self {
        Self {
            id: g.id,
            name: g.name,
        }
    }
}

/// Public representation of an account. Flags and groups are read-only.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "ana")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "Ana")]
    pub first_name: String,
    #[schema(example = "Lopez")]
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub groups: Vec<GroupResponse>,
}

impl UserResponse {
    pub fn new(user: user::Model, groups: Vec<GroupResponse>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            is_active: user.is_active,
            groups,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserListQuery {
    /// Page number (1-based, default 1).
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    pub per_page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub pagination: Pagination,
}
