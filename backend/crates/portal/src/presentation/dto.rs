//! API DTOs (Data Transfer Objects)
//!
//! Pages answer with JSON view models; field names are snake_case.

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::catalog::CatalogOutput;
use crate::domain::access::{AccessCell, AccessMatrix, UserAccessRow};
use crate::domain::catalog::{CatalogEntry, NoAccessNotice};
use crate::domain::entity::profile::Profile;
use crate::domain::value_object::{app_id::AppId, app_role::AppRole, global_role::GlobalRole};

// ============================================================================
// Auth forms
// ============================================================================

/// Query parameters the auth pages echo back
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthPageQuery {
    pub redirect: Option<String>,
    pub error: Option<String>,
    pub code: Option<String>,
}

/// View model for `/login`, `/signup`, `/forgot-password`, `/reset-password`
#[derive(Debug, Clone, Serialize)]
pub struct AuthPageResponse {
    pub page: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    /// Destination preserved by the guard
    #[serde(default)]
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub user_id: UserId,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecoverRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetRequest {
    pub code: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedirectResponse {
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogQuery {
    pub no_access: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppCardResponse {
    pub id: AppId,
    pub name: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub has_access: bool,
}

impl From<&CatalogEntry> for AppCardResponse {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.descriptor.id,
            name: entry.descriptor.name,
            description: entry.descriptor.description,
            url: entry.url,
            has_access: entry.has_access,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoAccessNoticeResponse {
    pub app_id: String,
    pub app_name: String,
    pub message: String,
}

impl From<NoAccessNotice> for NoAccessNoticeResponse {
    fn from(notice: NoAccessNotice) -> Self {
        let message = format!(
            "You don't have access to {}. Ask an administrator to grant it.",
            notice.app_name
        );
        Self {
            app_id: notice.app_id,
            app_name: notice.app_name,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub user: UserSummary,
    pub is_global_admin: bool,
    pub apps: Vec<AppCardResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoAccessNoticeResponse>,
}

impl From<CatalogOutput> for CatalogResponse {
    fn from(output: CatalogOutput) -> Self {
        Self {
            user: UserSummary {
                id: output.user_id,
                email: output.email,
                display_name: output.display_name,
            },
            is_global_admin: output.is_global_admin,
            apps: output.entries.iter().map(AppCardResponse::from).collect(),
            notice: output.notice.map(NoAccessNoticeResponse::from),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub global_role: GlobalRole,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            global_role: profile.global_role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileResponse {
    pub profile: ProfileResponse,
    pub message: &'static str,
}

// ============================================================================
// Admin console
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GrantAccessRequest {
    #[serde(default)]
    pub role: AppRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeGlobalRoleRequest {
    pub global_role: GlobalRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppColumnResponse {
    pub id: AppId,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CellState {
    GlobalAdmin,
    Granted { role: AppRole },
    Grantable,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessCellResponse {
    pub app_id: AppId,
    #[serde(flatten)]
    pub state: CellState,
    pub editable: bool,
}

impl AccessCellResponse {
    fn new(app_id: AppId, cell: AccessCell) -> Self {
        let state = match cell {
            AccessCell::GlobalAdmin => CellState::GlobalAdmin,
            AccessCell::Granted { role } => CellState::Granted { role },
            AccessCell::Grantable => CellState::Grantable,
        };
        Self {
            app_id,
            state,
            editable: cell.is_editable(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserAccessRowResponse {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub global_role: GlobalRole,
    pub is_global_admin: bool,
    pub cells: Vec<AccessCellResponse>,
}

impl From<&UserAccessRow> for UserAccessRowResponse {
    fn from(row: &UserAccessRow) -> Self {
        Self {
            user_id: row.user_id(),
            email: row.profile.email.clone(),
            display_name: row.profile.display_name().to_string(),
            global_role: row.profile.global_role,
            is_global_admin: row.profile.is_global_admin(),
            cells: AppId::catalog()
                .map(|app_id| AccessCellResponse::new(app_id, row.cell(app_id)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessMatrixResponse {
    pub columns: Vec<AppColumnResponse>,
    pub rows: Vec<UserAccessRowResponse>,
}

impl From<&AccessMatrix> for AccessMatrixResponse {
    fn from(matrix: &AccessMatrix) -> Self {
        Self {
            columns: matrix
                .columns
                .iter()
                .map(|app_id| AppColumnResponse {
                    id: *app_id,
                    name: app_id.descriptor().name,
                })
                .collect(),
            rows: matrix.rows.iter().map(UserAccessRowResponse::from).collect(),
        }
    }
}
