//! Sign Out Use Case

use std::sync::Arc;

use crate::domain::repository::IdentityProvider;
use crate::domain::value_object::token::AccessToken;

/// Sign out use case
pub struct SignOutUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
}

impl<P> SignOutUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Best effort: cookies are cleared by the caller either way.
    pub async fn execute(&self, access_token: Option<&AccessToken>) {
        let Some(token) = access_token else {
            return;
        };

        match self.provider.sign_out(token).await {
            Ok(()) => tracing::info!("User signed out"),
            Err(e) => {
                tracing::warn!(error = %e, "Provider sign out failed, clearing cookies anyway")
            }
        }
    }
}
