//! Auth Callback Use Case
//!
//! Landing point of confirmation links: trade the code for a session.

use std::sync::Arc;

use platform::redirect::{append_query, safe_redirect_target};

use crate::application::config::PortalConfig;
use crate::domain::entity::session::ProviderSession;
use crate::domain::repository::IdentityProvider;

pub const AUTH_CALLBACK_ERROR: &str = "auth_callback_error";

#[derive(Debug)]
pub enum AuthCallbackOutcome {
    SignedIn {
        session: ProviderSession,
        redirect_to: String,
    },
    /// Back to the login form with `?error=auth_callback_error`
    Failed { redirect_to: String },
}

pub struct AuthCallbackUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    config: Arc<PortalConfig>,
}

impl<P> AuthCallbackUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, config: Arc<PortalConfig>) -> Self {
        Self { provider, config }
    }

    pub async fn execute(
        &self,
        code: Option<&str>,
        code_verifier: Option<&str>,
        next: Option<&str>,
    ) -> AuthCallbackOutcome {
        let failed = || AuthCallbackOutcome::Failed {
            redirect_to: append_query(&self.config.guard.login_url, "error", AUTH_CALLBACK_ERROR),
        };

        let Some(code) = code.filter(|code| !code.is_empty()) else {
            return failed();
        };

        match self
            .provider
            .exchange_code_for_session(code, code_verifier.unwrap_or_default())
            .await
        {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Auth code exchanged");
                AuthCallbackOutcome::SignedIn {
                    session,
                    redirect_to: safe_redirect_target(next, &self.config.guard.after_login_url),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Auth code exchange failed");
                failed()
            }
        }
    }
}
