//! Provider Session
//!
//! Tokens issued by the provider after sign in, code exchange or refresh.

use crate::domain::entity::identity::UserIdentity;
use crate::domain::value_object::token::{AccessToken, RefreshToken};

#[derive(Debug, Clone)]
pub struct ProviderSession {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: UserIdentity,
}
