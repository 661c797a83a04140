//! Access Admin Use Case
//!
//! The admin console: load the matrix, and edit one row at a time. A
//! mutation reaches the local row only after the provider confirmed it;
//! a rejected write is returned as an error and the row stays as it was.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::resolve_session::AuthenticatedUser;
use crate::domain::access::{AccessMatrix, UserAccessRow};
use crate::domain::entity::{app_access::NewGrant, profile::Profile};
use crate::domain::repository::{AppAccessRepository, ProfileRepository};
use crate::domain::value_object::{app_id::AppId, app_role::AppRole, global_role::GlobalRole};
use crate::error::{PortalError, PortalResult};

pub struct AccessAdminUseCase<P>
where
    P: ProfileRepository + AppAccessRepository,
{
    provider: Arc<P>,
}

impl<P> AccessAdminUseCase<P>
where
    P: ProfileRepository + AppAccessRepository,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Acting user's profile, if it carries a global admin role.
    pub async fn require_admin(&self, actor: &AuthenticatedUser) -> PortalResult<Profile> {
        let profile = self
            .provider
            .find_profile(&actor.access_token, actor.identity.id)
            .await?;

        match profile {
            Some(profile) if profile.is_global_admin() => Ok(profile),
            _ => Err(PortalError::NotGlobalAdmin),
        }
    }

    pub async fn load_matrix(&self, actor: &AuthenticatedUser) -> PortalResult<AccessMatrix> {
        self.require_admin(actor).await?;

        let token = &actor.access_token;
        let profiles = self.provider.list_profiles(token).await?;
        let grants = self.provider.list_grants(token).await?;

        Ok(AccessMatrix::build(profiles, grants))
    }

    /// Grant or change `target`'s role on one application.
    pub async fn grant(
        &self,
        actor: &AuthenticatedUser,
        target: UserId,
        app_code: &str,
        role: AppRole,
    ) -> PortalResult<UserAccessRow> {
        let admin = self.require_admin(actor).await?;
        let app_id = editable_app(app_code)?;
        let mut row = self.load_editable_row(actor, target).await?;

        let grant = NewGrant {
            user_id: target,
            app_id,
            role,
            granted_by: admin.id,
        };
        let stored = self
            .provider
            .upsert_grant(&actor.access_token, &grant)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, user_id = %target, app_id = %app_id, "Grant rejected")
            })?;

        row.apply_grant(stored);
        tracing::info!(
            user_id = %target,
            app_id = %app_id,
            role = %role,
            granted_by = %admin.id,
            "Application access granted"
        );
        Ok(row)
    }

    pub async fn revoke(
        &self,
        actor: &AuthenticatedUser,
        target: UserId,
        app_code: &str,
    ) -> PortalResult<UserAccessRow> {
        let admin = self.require_admin(actor).await?;
        let app_id = editable_app(app_code)?;
        let mut row = self.load_editable_row(actor, target).await?;

        self.provider
            .delete_grant(&actor.access_token, target, app_id)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, user_id = %target, app_id = %app_id, "Revoke rejected")
            })?;

        row.apply_revoke(app_id);
        tracing::info!(
            user_id = %target,
            app_id = %app_id,
            revoked_by = %admin.id,
            "Application access revoked"
        );
        Ok(row)
    }

    pub async fn change_global_role(
        &self,
        actor: &AuthenticatedUser,
        target: UserId,
        role: GlobalRole,
    ) -> PortalResult<UserAccessRow> {
        let admin = self.require_admin(actor).await?;
        let mut row = self.load_row(actor, target).await?;

        self.provider
            .update_global_role(&actor.access_token, target, role)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, user_id = %target, "Role change rejected")
            })?;

        let previous = row.profile.global_role;
        row.apply_global_role(role);
        tracing::info!(
            user_id = %target,
            from = %previous,
            to = %role,
            changed_by = %admin.id,
            "Global role changed"
        );
        Ok(row)
    }

    async fn load_row(
        &self,
        actor: &AuthenticatedUser,
        target: UserId,
    ) -> PortalResult<UserAccessRow> {
        let token = &actor.access_token;
        let profile = self
            .provider
            .find_profile(token, target)
            .await?
            .ok_or(PortalError::ProfileNotFound)?;
        let grants = self.provider.list_grants_for_user(token, target).await?;

        Ok(UserAccessRow::new(profile, grants))
    }

    /// Row whose cells accept grant/revoke (not a global admin).
    async fn load_editable_row(
        &self,
        actor: &AuthenticatedUser,
        target: UserId,
    ) -> PortalResult<UserAccessRow> {
        let row = self.load_row(actor, target).await?;
        if row.profile.is_global_admin() {
            return Err(PortalError::NotGrantable(
                "Global admins already have access to every application".to_string(),
            ));
        }
        Ok(row)
    }
}

/// Catalog application named by `code`; the portal itself is not grantable.
fn editable_app(code: &str) -> PortalResult<AppId> {
    match AppId::from_code(code) {
        Some(AppId::AuthPortal) => Err(PortalError::NotGrantable(
            "Access to the portal itself is not managed per application".to_string(),
        )),
        Some(app_id) => Ok(app_id),
        None => Err(PortalError::UnknownApplication(code.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editable_app() {
        assert_eq!(editable_app("eximia-os").unwrap(), AppId::EximiaOs);
        assert!(matches!(
            editable_app("auth-portal"),
            Err(PortalError::NotGrantable(_))
        ));
        assert!(matches!(
            editable_app("nope"),
            Err(PortalError::UnknownApplication(_))
        ));
    }
}
