//! Sign In Use Case
//!
//! Email + password against the provider.

use std::sync::Arc;

use platform::redirect::safe_redirect_target;

use crate::application::config::PortalConfig;
use crate::domain::entity::session::ProviderSession;
use crate::domain::repository::IdentityProvider;
use crate::domain::value_object::email::Email;
use crate::error::{PortalError, PortalResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
    /// `redirect` query parameter carried over from the guard
    pub redirect: Option<String>,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub session: ProviderSession,
    /// Sanitized destination
    pub redirect_to: String,
}

/// Sign in use case
pub struct SignInUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    config: Arc<PortalConfig>,
}

impl<P> SignInUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, config: Arc<PortalConfig>) -> Self {
        Self { provider, config }
    }

    pub async fn execute(&self, input: SignInInput) -> PortalResult<SignInOutput> {
        let email = Email::new(input.email)?;
        if input.password.is_empty() {
            return Err(PortalError::Validation("Password is required".to_string()));
        }

        let session = self
            .provider
            .sign_in_with_password(&email, &input.password)
            .await?;

        let redirect_to = safe_redirect_target(
            input.redirect.as_deref(),
            &self.config.guard.after_login_url,
        );

        tracing::info!(user_id = %session.user.id, "User signed in");

        Ok(SignInOutput {
            session,
            redirect_to,
        })
    }
}
