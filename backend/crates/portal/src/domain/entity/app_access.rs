//! Application Access Grant Entity
//!
//! A row in `app_access`, unique per `(user_id, app_id)`.

use kernel::id::{AppAccessId, UserId};

use crate::domain::value_object::{app_id::AppId, app_role::AppRole};

/// Stored grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppAccessGrant {
    pub id: AppAccessId,
    pub user_id: UserId,
    pub app_id: AppId,
    pub role: AppRole,
    /// Admin who wrote the grant last
    pub granted_by: Option<UserId>,
}

/// Upsert payload; the provider assigns the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewGrant {
    pub user_id: UserId,
    pub app_id: AppId,
    pub role: AppRole,
    pub granted_by: UserId,
}
