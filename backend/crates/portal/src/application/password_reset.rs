//! Password Reset Use Cases
//!
//! Two steps: request a recovery email, then come back with the code from
//! the link and choose a new password.

use std::sync::Arc;

use platform::crypto::PkcePair;

use crate::application::config::PortalConfig;
use crate::domain::entity::session::ProviderSession;
use crate::domain::repository::IdentityProvider;
use crate::domain::value_object::{email::Email, password::NewPassword};
use crate::error::{PortalError, PortalResult};

const INVALID_RESET_LINK: &str = "Reset link is invalid or has expired";

/// Output of the recovery email request
pub struct RequestPasswordResetOutput {
    pub code_verifier: String,
}

/// Forgot-password use case
pub struct RequestPasswordResetUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    config: Arc<PortalConfig>,
}

impl<P> RequestPasswordResetUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, config: Arc<PortalConfig>) -> Self {
        Self { provider, config }
    }

    pub async fn execute(&self, email: String) -> PortalResult<RequestPasswordResetOutput> {
        let email = Email::new(email)?;
        let pkce = PkcePair::generate();

        self.provider
            .reset_password_for_email(&email, &self.config.password_reset_url(), &pkce.challenge)
            .await?;

        tracing::info!(email = %email, "Password recovery email requested");

        Ok(RequestPasswordResetOutput {
            code_verifier: pkce.verifier,
        })
    }
}

/// Reset password input
pub struct ResetPasswordInput {
    /// `code` from the recovery link
    pub code: String,
    pub password: String,
    pub confirm_password: String,
    /// Verifier cookie set by the recovery request
    pub code_verifier: Option<String>,
}

/// Reset password output
#[derive(Debug)]
pub struct ResetPasswordOutput {
    pub session: ProviderSession,
    pub redirect_to: String,
}

/// Reset password use case
pub struct ResetPasswordUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    config: Arc<PortalConfig>,
}

impl<P> ResetPasswordUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, config: Arc<PortalConfig>) -> Self {
        Self { provider, config }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> PortalResult<ResetPasswordOutput> {
        let password = NewPassword::new(input.password, &input.confirm_password)?;

        let code = input.code.trim();
        let verifier = input.code_verifier.as_deref().unwrap_or_default();
        if code.is_empty() || verifier.is_empty() {
            return Err(PortalError::Validation(INVALID_RESET_LINK.to_string()));
        }

        let session = self.provider.exchange_code_for_session(code, verifier).await?;
        self.provider
            .update_user_password(&session.access_token, &password)
            .await?;

        tracing::info!(user_id = %session.user.id, "Password updated");

        Ok(ResetPasswordOutput {
            session,
            redirect_to: self.config.guard.after_login_url.clone(),
        })
    }
}
