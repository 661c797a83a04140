//! In-Memory Provider
//!
//! Behaves like the hosted provider closely enough for tests and local
//! runs without a Supabase project: confirmation codes with PKCE checks,
//! token rotation, profiles created on sign up, upsert on
//! `(user_id, app_id)`. Writes can be made to fail on demand.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use kernel::id::{AppAccessId, UserId};
use platform::crypto::pkce_challenge;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entity::{
    app_access::{AppAccessGrant, NewGrant},
    identity::UserIdentity,
    profile::Profile,
    session::ProviderSession,
};
use crate::domain::repository::{
    AppAccessRepository, IdentityProvider, ProfileRepository, SignUpCommand,
};
use crate::domain::value_object::{
    app_id::AppId,
    email::Email,
    global_role::GlobalRole,
    password::NewPassword,
    token::{AccessToken, RefreshToken},
};
use crate::error::{PortalError, PortalResult};

const ACCESS_TOKEN_TTL_SECS: i64 = 3600;

/// Why an email was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailKind {
    Confirmation,
    Recovery,
}

/// Captured outgoing email
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub kind: EmailKind,
    pub to: String,
    pub redirect_to: String,
    /// One-time code carried by the link
    pub code: String,
}

struct StoredUser {
    identity: UserIdentity,
    password: String,
    confirmed: bool,
}

struct PendingCode {
    user_id: UserId,
    code_challenge: String,
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, StoredUser>,
    access_tokens: HashMap<String, UserId>,
    refresh_tokens: HashMap<String, UserId>,
    codes: HashMap<String, PendingCode>,
    profiles: HashMap<UserId, Profile>,
    grants: Vec<AppAccessGrant>,
    outbox: Vec<SentEmail>,
    fail_writes: bool,
}

impl State {
    fn user_by_email(&self, email: &Email) -> Option<&StoredUser> {
        self.users.values().find(|user| &user.identity.email == email)
    }

    fn authorize(&self, token: &AccessToken) -> PortalResult<UserId> {
        self.access_tokens
            .get(token.expose())
            .copied()
            .ok_or_else(|| PortalError::provider(401, "Invalid or expired session"))
    }

    fn check_write(&self) -> PortalResult<()> {
        if self.fail_writes {
            return Err(PortalError::provider(503, "Write rejected by provider"));
        }
        Ok(())
    }

    fn issue_session(&mut self, user_id: UserId) -> PortalResult<ProviderSession> {
        let identity = self
            .users
            .get(&user_id)
            .map(|user| user.identity.clone())
            .ok_or_else(|| PortalError::provider(404, "User not found"))?;

        let access = random_token();
        let refresh = random_token();
        self.access_tokens.insert(access.clone(), user_id);
        self.refresh_tokens.insert(refresh.clone(), user_id);

        Ok(ProviderSession {
            access_token: AccessToken::new(access),
            refresh_token: RefreshToken::new(refresh),
            expires_in: ACCESS_TOKEN_TTL_SECS,
            user: identity,
        })
    }

    fn send_code(
        &mut self,
        kind: EmailKind,
        user_id: UserId,
        to: &Email,
        redirect_to: &str,
        code_challenge: &str,
    ) {
        let code = random_token();
        self.codes.insert(
            code.clone(),
            PendingCode {
                user_id,
                code_challenge: code_challenge.to_string(),
            },
        );
        self.outbox.push(SentEmail {
            kind,
            to: to.to_string(),
            redirect_to: redirect_to.to_string(),
            code,
        });
    }
}

fn random_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Provider double backed by process memory
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    state: Arc<Mutex<State>>,
    /// Profiles get increasing `created_at` so listing order is stable
    epoch: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    async fn next_created_at(&self) -> DateTime<Utc> {
        let mut epoch = self.epoch.lock().await;
        let next = match *epoch {
            Some(previous) => previous + Duration::seconds(1),
            None => Utc::now(),
        };
        *epoch = Some(next);
        next
    }

    /// Seed a confirmed user with a profile.
    pub async fn add_user(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        global_role: GlobalRole,
    ) -> PortalResult<UserId> {
        let email = Email::new(email)?;
        let created_at = self.next_created_at().await;
        let mut state = self.state.lock().await;

        if state.user_by_email(&email).is_some() {
            return Err(PortalError::provider(422, "User already registered"));
        }

        let id = UserId::new();
        let full_name = full_name.map(str::to_string);
        state.users.insert(
            id,
            StoredUser {
                identity: UserIdentity {
                    id,
                    email: email.clone(),
                    full_name: full_name.clone(),
                },
                password: password.to_string(),
                confirmed: true,
            },
        );
        state.profiles.insert(
            id,
            Profile {
                id,
                email: email.to_string(),
                full_name,
                global_role,
                created_at,
            },
        );
        Ok(id)
    }

    /// Seed a grant row directly, bypassing the write switch.
    pub async fn add_grant(&self, grant: NewGrant) -> AppAccessGrant {
        let mut state = self.state.lock().await;
        upsert(&mut state.grants, &grant)
    }

    /// Make every table and password write fail until switched back.
    pub async fn set_fail_writes(&self, fail: bool) {
        self.state.lock().await.fail_writes = fail;
    }

    /// Forget an access token, as if it expired.
    pub async fn expire_access_token(&self, token: &AccessToken) {
        self.state.lock().await.access_tokens.remove(token.expose());
    }

    /// Emails sent so far, oldest first.
    pub async fn outbox(&self) -> Vec<SentEmail> {
        self.state.lock().await.outbox.clone()
    }

    pub async fn last_email_to(&self, to: &str) -> Option<SentEmail> {
        self.state
            .lock()
            .await
            .outbox
            .iter()
            .rev()
            .find(|email| email.to == to)
            .cloned()
    }

    pub async fn grants_for(&self, user_id: UserId) -> Vec<AppAccessGrant> {
        self.state
            .lock()
            .await
            .grants
            .iter()
            .filter(|grant| grant.user_id == user_id)
            .cloned()
            .collect()
    }
}

fn upsert(grants: &mut Vec<AppAccessGrant>, grant: &NewGrant) -> AppAccessGrant {
    if let Some(existing) = grants
        .iter_mut()
        .find(|g| g.user_id == grant.user_id && g.app_id == grant.app_id)
    {
        existing.role = grant.role;
        existing.granted_by = Some(grant.granted_by);
        return existing.clone();
    }

    let stored = AppAccessGrant {
        id: AppAccessId::new(),
        user_id: grant.user_id,
        app_id: grant.app_id,
        role: grant.role,
        granted_by: Some(grant.granted_by),
    };
    grants.push(stored.clone());
    stored
}

// ============================================================================
// Identity Provider Implementation
// ============================================================================

impl IdentityProvider for InMemoryProvider {
    async fn get_user(&self, token: &AccessToken) -> PortalResult<UserIdentity> {
        let state = self.state.lock().await;
        let user_id = state.authorize(token)?;
        state
            .users
            .get(&user_id)
            .map(|user| user.identity.clone())
            .ok_or_else(|| PortalError::provider(404, "User not found"))
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> PortalResult<ProviderSession> {
        let mut state = self.state.lock().await;
        let user = state
            .user_by_email(email)
            .filter(|user| user.password == password)
            .ok_or_else(|| PortalError::provider(400, "Invalid login credentials"))?;

        if !user.confirmed {
            return Err(PortalError::provider(400, "Email not confirmed"));
        }

        let user_id = user.identity.id;
        state.issue_session(user_id)
    }

    async fn sign_up(&self, command: &SignUpCommand) -> PortalResult<()> {
        let created_at = self.next_created_at().await;
        let mut state = self.state.lock().await;

        if state.user_by_email(&command.email).is_some() {
            return Err(PortalError::provider(422, "User already registered"));
        }

        let id = UserId::new();
        state.users.insert(
            id,
            StoredUser {
                identity: UserIdentity {
                    id,
                    email: command.email.clone(),
                    full_name: command.full_name.clone(),
                },
                password: command.password.expose().to_string(),
                confirmed: false,
            },
        );
        state.profiles.insert(
            id,
            Profile {
                id,
                email: command.email.to_string(),
                full_name: command.full_name.clone(),
                global_role: GlobalRole::Member,
                created_at,
            },
        );
        state.send_code(
            EmailKind::Confirmation,
            id,
            &command.email,
            &command.email_redirect_to,
            &command.code_challenge,
        );
        Ok(())
    }

    async fn sign_out(&self, token: &AccessToken) -> PortalResult<()> {
        let mut state = self.state.lock().await;
        let user_id = state.authorize(token)?;
        state.access_tokens.retain(|_, owner| *owner != user_id);
        state.refresh_tokens.retain(|_, owner| *owner != user_id);
        Ok(())
    }

    async fn reset_password_for_email(
        &self,
        email: &Email,
        redirect_to: &str,
        code_challenge: &str,
    ) -> PortalResult<()> {
        let mut state = self.state.lock().await;
        // Unknown addresses succeed silently so accounts cannot be probed
        if let Some(user_id) = state.user_by_email(email).map(|user| user.identity.id) {
            state.send_code(EmailKind::Recovery, user_id, email, redirect_to, code_challenge);
        }
        Ok(())
    }

    async fn update_user_password(
        &self,
        token: &AccessToken,
        password: &NewPassword,
    ) -> PortalResult<()> {
        let mut state = self.state.lock().await;
        let user_id = state.authorize(token)?;
        state.check_write()?;

        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| PortalError::provider(404, "User not found"))?;
        if user.password == password.expose() {
            return Err(PortalError::provider(
                422,
                "New password should be different from the old password.",
            ));
        }
        user.password = password.expose().to_string();
        Ok(())
    }

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> PortalResult<ProviderSession> {
        let mut state = self.state.lock().await;
        let pending = state
            .codes
            .remove(auth_code)
            .ok_or_else(|| {
                PortalError::provider(404, "invalid flow state, no valid flow state found")
            })?;

        if pkce_challenge(code_verifier) != pending.code_challenge {
            return Err(PortalError::provider(
                400,
                "code challenge does not match previously saved code verifier",
            ));
        }

        if let Some(user) = state.users.get_mut(&pending.user_id) {
            user.confirmed = true;
        }
        state.issue_session(pending.user_id)
    }

    async fn refresh_session(
        &self,
        refresh_token: &RefreshToken,
    ) -> PortalResult<ProviderSession> {
        let mut state = self.state.lock().await;
        let user_id = state
            .refresh_tokens
            .remove(refresh_token.expose())
            .ok_or_else(|| {
                PortalError::provider(400, "Invalid Refresh Token: Refresh Token Not Found")
            })?;
        state.issue_session(user_id)
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for InMemoryProvider {
    async fn find_profile(
        &self,
        token: &AccessToken,
        user_id: UserId,
    ) -> PortalResult<Option<Profile>> {
        let state = self.state.lock().await;
        state.authorize(token)?;
        Ok(state.profiles.get(&user_id).cloned())
    }

    async fn list_profiles(&self, token: &AccessToken) -> PortalResult<Vec<Profile>> {
        let state = self.state.lock().await;
        state.authorize(token)?;
        let mut profiles: Vec<Profile> = state.profiles.values().cloned().collect();
        profiles.sort_by_key(|profile| profile.created_at);
        Ok(profiles)
    }

    async fn update_global_role(
        &self,
        token: &AccessToken,
        user_id: UserId,
        role: GlobalRole,
    ) -> PortalResult<()> {
        let mut state = self.state.lock().await;
        state.authorize(token)?;
        state.check_write()?;
        let profile = state
            .profiles
            .get_mut(&user_id)
            .ok_or(PortalError::ProfileNotFound)?;
        profile.global_role = role;
        Ok(())
    }

    async fn update_full_name(
        &self,
        token: &AccessToken,
        user_id: UserId,
        full_name: Option<&str>,
    ) -> PortalResult<()> {
        let mut state = self.state.lock().await;
        state.authorize(token)?;
        state.check_write()?;
        let profile = state
            .profiles
            .get_mut(&user_id)
            .ok_or(PortalError::ProfileNotFound)?;
        profile.full_name = full_name.map(str::to_string);
        Ok(())
    }
}

// ============================================================================
// App Access Repository Implementation
// ============================================================================

impl AppAccessRepository for InMemoryProvider {
    async fn list_grants(&self, token: &AccessToken) -> PortalResult<Vec<AppAccessGrant>> {
        let state = self.state.lock().await;
        state.authorize(token)?;
        Ok(state.grants.clone())
    }

    async fn list_grants_for_user(
        &self,
        token: &AccessToken,
        user_id: UserId,
    ) -> PortalResult<Vec<AppAccessGrant>> {
        let state = self.state.lock().await;
        state.authorize(token)?;
        Ok(state
            .grants
            .iter()
            .filter(|grant| grant.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_grant(
        &self,
        token: &AccessToken,
        grant: &NewGrant,
    ) -> PortalResult<AppAccessGrant> {
        let mut state = self.state.lock().await;
        state.authorize(token)?;
        state.check_write()?;
        Ok(upsert(&mut state.grants, grant))
    }

    async fn delete_grant(
        &self,
        token: &AccessToken,
        user_id: UserId,
        app_id: AppId,
    ) -> PortalResult<()> {
        let mut state = self.state.lock().await;
        state.authorize(token)?;
        state.check_write()?;

        let before = state.grants.len();
        state
            .grants
            .retain(|grant| !(grant.user_id == user_id && grant.app_id == app_id));
        if state.grants.len() == before {
            return Err(PortalError::provider(404, "Access grant not found"));
        }
        Ok(())
    }
}
