//! Sign Up Use Case
//!
//! Creates an identity at the provider. The account becomes usable once
//! the confirmation link (PKCE code flow) is followed.

use std::sync::Arc;

use platform::crypto::PkcePair;

use crate::application::config::PortalConfig;
use crate::domain::repository::{IdentityProvider, SignUpCommand};
use crate::domain::value_object::{email::Email, full_name::FullName, password::NewPassword};
use crate::error::PortalResult;

/// Sign up input
pub struct SignUpInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub email: Email,
    /// Must survive in a cookie until the confirmation link comes back
    pub code_verifier: String,
}

/// Sign up use case
pub struct SignUpUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
    config: Arc<PortalConfig>,
}

impl<P> SignUpUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>, config: Arc<PortalConfig>) -> Self {
        Self { provider, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> PortalResult<SignUpOutput> {
        let password = NewPassword::new(input.password, &input.confirm_password)?;
        let email = Email::new(input.email)?;
        let full_name = FullName::new(&input.full_name)?;

        let pkce = PkcePair::generate();
        let command = SignUpCommand {
            email: email.clone(),
            password,
            full_name: full_name.into_inner(),
            email_redirect_to: self.config.email_callback_url(),
            code_challenge: pkce.challenge,
        };

        self.provider.sign_up(&command).await?;

        tracing::info!(email = %email, "Sign up requested, confirmation email sent");

        Ok(SignUpOutput {
            email,
            code_verifier: pkce.verifier,
        })
    }
}
