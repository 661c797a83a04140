//! Application Catalog
//!
//! What the signed-in user sees on `/apps`.

use crate::domain::access::effective_access;
use crate::domain::entity::app_access::AppAccessGrant;
use crate::domain::value_object::{
    app_id::{AppDescriptor, AppId},
    environment::Environment,
    global_role::GlobalRole,
};

/// One card in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub descriptor: &'static AppDescriptor,
    pub url: &'static str,
    /// Active link when true, disabled placeholder otherwise
    pub has_access: bool,
}

/// Cards for every catalog application, in declaration order.
pub fn build_catalog(
    global_role: GlobalRole,
    grants: &[AppAccessGrant],
    environment: Environment,
) -> Vec<CatalogEntry> {
    AppId::catalog()
        .map(|app_id| {
            let descriptor = app_id.descriptor();
            CatalogEntry {
                descriptor,
                url: descriptor.base_url(environment),
                has_access: effective_access(global_role, grants, app_id),
            }
        })
        .collect()
}

/// Inline notice after an application bounced the user with `?no_access=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoAccessNotice {
    pub app_id: String,
    /// Display name when the id is known, the raw id otherwise
    pub app_name: String,
}

impl NoAccessNotice {
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;
        let app_name = match AppId::from_code(raw) {
            Some(app_id) => app_id.descriptor().name.to_string(),
            None => raw.to_string(),
        };
        Some(Self {
            app_id: raw.to_string(),
            app_name,
        })
    }
}
