//! Provider Traits
//!
//! The narrow surface of the authentication provider this crate uses.
//! Every call that acts for a user takes that user's access token; the
//! provider's row-level policies decide what the token may see.

use kernel::id::UserId;

use crate::domain::entity::{
    app_access::{AppAccessGrant, NewGrant},
    identity::UserIdentity,
    profile::Profile,
    session::ProviderSession,
};
use crate::domain::value_object::{
    app_id::AppId,
    email::Email,
    global_role::GlobalRole,
    password::NewPassword,
    token::{AccessToken, RefreshToken},
};
use crate::error::PortalResult;

/// Sign up payload
#[derive(Debug)]
pub struct SignUpCommand {
    pub email: Email,
    pub password: NewPassword,
    pub full_name: Option<String>,
    /// Where the confirmation link sends the browser
    pub email_redirect_to: String,
    /// S256 challenge of the verifier kept in a cookie
    pub code_challenge: String,
}

/// Identity operations (sessions, passwords, confirmation emails)
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Resolve the user behind an access token
    async fn get_user(&self, token: &AccessToken) -> PortalResult<UserIdentity>;

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> PortalResult<ProviderSession>;

    /// Create an identity; the provider sends the confirmation email
    async fn sign_up(&self, command: &SignUpCommand) -> PortalResult<()>;

    /// Invalidate the session server-side
    async fn sign_out(&self, token: &AccessToken) -> PortalResult<()>;

    async fn reset_password_for_email(
        &self,
        email: &Email,
        redirect_to: &str,
        code_challenge: &str,
    ) -> PortalResult<()>;

    async fn update_user_password(
        &self,
        token: &AccessToken,
        password: &NewPassword,
    ) -> PortalResult<()>;

    /// Trade a one-time code from an email link for a session (PKCE)
    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> PortalResult<ProviderSession>;

    async fn refresh_session(&self, refresh_token: &RefreshToken) -> PortalResult<ProviderSession>;
}

/// `profiles` table
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    async fn find_profile(
        &self,
        token: &AccessToken,
        user_id: UserId,
    ) -> PortalResult<Option<Profile>>;

    /// All profiles, oldest first
    async fn list_profiles(&self, token: &AccessToken) -> PortalResult<Vec<Profile>>;

    async fn update_global_role(
        &self,
        token: &AccessToken,
        user_id: UserId,
        role: GlobalRole,
    ) -> PortalResult<()>;

    /// `None` clears the name
    async fn update_full_name(
        &self,
        token: &AccessToken,
        user_id: UserId,
        full_name: Option<&str>,
    ) -> PortalResult<()>;
}

/// `app_access` table
#[trait_variant::make(AppAccessRepository: Send)]
pub trait LocalAppAccessRepository {
    async fn list_grants(&self, token: &AccessToken) -> PortalResult<Vec<AppAccessGrant>>;

    async fn list_grants_for_user(
        &self,
        token: &AccessToken,
        user_id: UserId,
    ) -> PortalResult<Vec<AppAccessGrant>>;

    /// Insert or replace on `(user_id, app_id)`; returns the stored row
    async fn upsert_grant(
        &self,
        token: &AccessToken,
        grant: &NewGrant,
    ) -> PortalResult<AppAccessGrant>;

    async fn delete_grant(
        &self,
        token: &AccessToken,
        user_id: UserId,
        app_id: AppId,
    ) -> PortalResult<()>;
}

/// Everything the portal needs from one provider.
pub trait PortalProvider:
    IdentityProvider + ProfileRepository + AppAccessRepository + Clone + Send + Sync + 'static
{
}

impl<T> PortalProvider for T where
    T: IdentityProvider + ProfileRepository + AppAccessRepository + Clone + Send + Sync + 'static
{
}
