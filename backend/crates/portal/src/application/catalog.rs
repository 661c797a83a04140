//! Catalog Use Case
//!
//! Builds the `/apps` page for the signed-in user.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::PortalConfig;
use crate::application::resolve_session::AuthenticatedUser;
use crate::domain::catalog::{CatalogEntry, NoAccessNotice, build_catalog};
use crate::domain::repository::{AppAccessRepository, ProfileRepository};
use crate::domain::value_object::global_role::GlobalRole;
use crate::error::PortalResult;

pub struct CatalogOutput {
    pub user_id: UserId,
    pub email: String,
    /// Profile name, then metadata name, then email
    pub display_name: String,
    /// Shows the admin console link
    pub is_global_admin: bool,
    pub entries: Vec<CatalogEntry>,
    pub notice: Option<NoAccessNotice>,
}

pub struct CatalogUseCase<P>
where
    P: ProfileRepository + AppAccessRepository,
{
    provider: Arc<P>,
    config: Arc<PortalConfig>,
}

impl<P> CatalogUseCase<P>
where
    P: ProfileRepository + AppAccessRepository,
{
    pub fn new(provider: Arc<P>, config: Arc<PortalConfig>) -> Self {
        Self { provider, config }
    }

    pub async fn execute(
        &self,
        user: &AuthenticatedUser,
        no_access: Option<&str>,
    ) -> PortalResult<CatalogOutput> {
        let token = &user.access_token;
        let identity = &user.identity;

        let profile = self.provider.find_profile(token, identity.id).await?;
        let grants = self.provider.list_grants_for_user(token, identity.id).await?;

        // No profile row: grants alone decide
        let global_role = profile
            .as_ref()
            .map_or(GlobalRole::Member, |profile| profile.global_role);

        let non_blank = |name: &Option<String>| name.clone().filter(|n| !n.trim().is_empty());
        let display_name = profile
            .as_ref()
            .and_then(|profile| non_blank(&profile.full_name))
            .or_else(|| non_blank(&identity.full_name))
            .unwrap_or_else(|| identity.email.to_string());

        Ok(CatalogOutput {
            user_id: identity.id,
            email: identity.email.to_string(),
            display_name,
            is_global_admin: global_role.is_global_admin(),
            entries: build_catalog(global_role, &grants, self.config.environment),
            notice: NoAccessNotice::from_param(no_access),
        })
    }
}
