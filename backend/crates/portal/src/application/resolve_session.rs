//! Resolve Session Use Case
//!
//! Turns the session cookies of a request into a [`SessionContext`].
//! Fails closed: every error ends in an anonymous context.

use std::sync::Arc;

use crate::domain::entity::{identity::UserIdentity, session::ProviderSession};
use crate::domain::repository::IdentityProvider;
use crate::domain::value_object::token::{AccessToken, RefreshToken};
use crate::error::{PortalError, PortalResult};

/// Signed-in user plus the token to act on their behalf
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: UserIdentity,
    pub access_token: AccessToken,
}

/// Session state handed to every handler
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    user: Option<AuthenticatedUser>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(identity: UserIdentity, access_token: AccessToken) -> Self {
        Self {
            user: Some(AuthenticatedUser {
                identity,
                access_token,
            }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn require(&self) -> PortalResult<&AuthenticatedUser> {
        self.user.as_ref().ok_or(PortalError::Unauthenticated)
    }
}

/// Result of resolving; `refreshed` is set when new cookies must be written
#[derive(Debug, Clone, Default)]
pub struct ResolvedSession {
    pub context: SessionContext,
    pub refreshed: Option<ProviderSession>,
}

pub struct ResolveSessionUseCase<P>
where
    P: IdentityProvider,
{
    provider: Arc<P>,
}

impl<P> ResolveSessionUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Validate the access token; if that fails, try the refresh token once.
    pub async fn execute(
        &self,
        access_token: Option<AccessToken>,
        refresh_token: Option<RefreshToken>,
    ) -> ResolvedSession {
        if let Some(token) = access_token {
            match self.provider.get_user(&token).await {
                Ok(identity) => {
                    return ResolvedSession {
                        context: SessionContext::authenticated(identity, token),
                        refreshed: None,
                    };
                }
                Err(e) => tracing::debug!(error = %e, "Access token rejected"),
            }
        }

        let Some(refresh_token) = refresh_token else {
            return ResolvedSession::default();
        };

        match self.provider.refresh_session(&refresh_token).await {
            Ok(session) => {
                tracing::debug!(user_id = %session.user.id, "Session refreshed");
                ResolvedSession {
                    context: SessionContext::authenticated(
                        session.user.clone(),
                        session.access_token.clone(),
                    ),
                    refreshed: Some(session),
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Refresh token rejected");
                ResolvedSession::default()
            }
        }
    }
}
