//! Profile Use Case
//!
//! The signed-in user's own profile. Only the display name is editable
//! here; the global role is managed from the admin console.

use std::sync::Arc;

use crate::application::resolve_session::AuthenticatedUser;
use crate::domain::entity::profile::Profile;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::full_name::FullName;
use crate::error::{PortalError, PortalResult};

pub const PROFILE_UPDATED: &str = "Profile updated";

pub struct ProfileUseCase<P>
where
    P: ProfileRepository,
{
    provider: Arc<P>,
}

impl<P> ProfileUseCase<P>
where
    P: ProfileRepository,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub async fn get(&self, user: &AuthenticatedUser) -> PortalResult<Profile> {
        self.provider
            .find_profile(&user.access_token, user.identity.id)
            .await?
            .ok_or(PortalError::ProfileNotFound)
    }

    pub async fn update_full_name(
        &self,
        user: &AuthenticatedUser,
        full_name: &str,
    ) -> PortalResult<Profile> {
        let full_name = FullName::new(full_name)?;
        let mut profile = self.get(user).await?;

        self.provider
            .update_full_name(&user.access_token, profile.id, full_name.as_deref())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Profile update rejected"))?;

        profile.full_name = full_name.into_inner();
        tracing::info!(user_id = %profile.id, "Profile updated");
        Ok(profile)
    }
}
