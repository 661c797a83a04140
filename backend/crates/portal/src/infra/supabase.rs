//! Supabase Provider Implementation
//!
//! GoTrue (`/auth/v1`) for identities and sessions, PostgREST (`/rest/v1`)
//! for the `profiles` and `app_access` tables. Table calls carry the
//! user's access token so row-level security applies.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{AppAccessId, UserId};
use platform::redirect::append_query;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
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
    app_role::AppRole,
    email::Email,
    global_role::GlobalRole,
    password::NewPassword,
    token::{AccessToken, RefreshToken},
};
use crate::error::{PortalError, PortalResult};

const PKCE_METHOD: &str = "s256";
const GRANT_NOT_FOUND: &str = "Access grant not found";

/// Supabase project client
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    anon_key: Arc<str>,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> PortalResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("eximia-portal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').into(),
            anon_key: anon_key.into(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1{}", self.base_url, path)
    }

    /// `apikey` always; bearer is the user's token or the anon key
    fn request(&self, method: Method, url: String, token: Option<&AccessToken>) -> RequestBuilder {
        let bearer = token.map_or(&*self.anon_key, AccessToken::expose);
        self.http
            .request(method, url)
            .header("apikey", &*self.anon_key)
            .bearer_auth(bearer)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> PortalResult<T> {
        let response = Self::send(request).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| PortalError::Decode(e.to_string()))
    }

    async fn send_empty(request: RequestBuilder) -> PortalResult<()> {
        Self::send(request).await.map(drop)
    }

    async fn send(request: RequestBuilder) -> PortalResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = provider_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Provider error").to_string());
        Err(PortalError::provider(status.as_u16(), message))
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> PortalResult<ProviderSession> {
        let url = append_query(&self.auth_url("/token"), "grant_type", grant_type);
        let session: SessionBody =
            Self::send_json(self.request(Method::POST, url, None).json(&body)).await?;
        session.into_session()
    }
}

/// GoTrue and PostgREST disagree on the error field name.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

fn provider_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    [parsed.msg, parsed.error_description, parsed.message, parsed.error]
        .into_iter()
        .flatten()
        .find(|message| !message.trim().is_empty())
}

// ============================================================================
// Wire formats
// ============================================================================

#[derive(Debug, Deserialize)]
struct UserBody {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl UserBody {
    fn into_identity(self) -> UserIdentity {
        let full_name = self
            .user_metadata
            .get("full_name")
            .and_then(serde_json::Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string);

        UserIdentity {
            id: UserId::from_uuid(self.id),
            email: Email::from_provider(self.email.unwrap_or_default()),
            full_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: Option<UserBody>,
}

impl SessionBody {
    fn into_session(self) -> PortalResult<ProviderSession> {
        let user = self
            .user
            .ok_or_else(|| PortalError::Decode("session without user".to_string()))?;
        Ok(ProviderSession {
            access_token: AccessToken::new(self.access_token),
            refresh_token: RefreshToken::new(self.refresh_token),
            expires_in: self.expires_in,
            user: user.into_identity(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: Uuid,
    email: Option<String>,
    full_name: Option<String>,
    global_role: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: UserId::from_uuid(row.id),
            email: row.email.unwrap_or_default(),
            full_name: row.full_name,
            global_role: GlobalRole::from_stored(row.global_role.as_deref()),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AppAccessRow {
    id: Uuid,
    user_id: Uuid,
    app_id: String,
    role: String,
    granted_by: Option<Uuid>,
}

impl AppAccessRow {
    /// `None` (with a warning) for apps or roles this build does not know.
    fn into_grant(self) -> Option<AppAccessGrant> {
        let Some(app_id) = AppId::from_code(&self.app_id) else {
            tracing::warn!(
                app_id = %self.app_id,
                row_id = %self.id,
                "Skipping grant for unknown application"
            );
            return None;
        };
        let Some(role) = AppRole::from_code(&self.role) else {
            tracing::warn!(
                role = %self.role,
                row_id = %self.id,
                "Skipping grant with unknown role"
            );
            return None;
        };

        Some(AppAccessGrant {
            id: AppAccessId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            app_id,
            role,
            granted_by: self.granted_by.map(UserId::from_uuid),
        })
    }
}

fn into_grants(rows: Vec<AppAccessRow>) -> Vec<AppAccessGrant> {
    rows.into_iter().filter_map(AppAccessRow::into_grant).collect()
}

// ============================================================================
// Identity Provider Implementation
// ============================================================================

impl IdentityProvider for SupabaseClient {
    async fn get_user(&self, token: &AccessToken) -> PortalResult<UserIdentity> {
        let user: UserBody =
            Self::send_json(self.request(Method::GET, self.auth_url("/user"), Some(token))).await?;
        Ok(user.into_identity())
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &str,
    ) -> PortalResult<ProviderSession> {
        self.token_grant(
            "password",
            json!({ "email": email.as_str(), "password": password }),
        )
        .await
    }

    async fn sign_up(&self, command: &SignUpCommand) -> PortalResult<()> {
        let url = append_query(
            &self.auth_url("/signup"),
            "redirect_to",
            &command.email_redirect_to,
        );
        let body = json!({
            "email": command.email.as_str(),
            "password": command.password.expose(),
            "data": { "full_name": command.full_name },
            "code_challenge": command.code_challenge,
            "code_challenge_method": PKCE_METHOD,
        });
        Self::send_empty(self.request(Method::POST, url, None).json(&body)).await
    }

    async fn sign_out(&self, token: &AccessToken) -> PortalResult<()> {
        Self::send_empty(self.request(Method::POST, self.auth_url("/logout"), Some(token))).await
    }

    async fn reset_password_for_email(
        &self,
        email: &Email,
        redirect_to: &str,
        code_challenge: &str,
    ) -> PortalResult<()> {
        let url = append_query(&self.auth_url("/recover"), "redirect_to", redirect_to);
        let body = json!({
            "email": email.as_str(),
            "code_challenge": code_challenge,
            "code_challenge_method": PKCE_METHOD,
        });
        Self::send_empty(self.request(Method::POST, url, None).json(&body)).await
    }

    async fn update_user_password(
        &self,
        token: &AccessToken,
        password: &NewPassword,
    ) -> PortalResult<()> {
        let body = json!({ "password": password.expose() });
        Self::send_empty(
            self.request(Method::PUT, self.auth_url("/user"), Some(token))
                .json(&body),
        )
        .await
    }

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> PortalResult<ProviderSession> {
        self.token_grant(
            "pkce",
            json!({ "auth_code": auth_code, "code_verifier": code_verifier }),
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &RefreshToken) -> PortalResult<ProviderSession> {
        self.token_grant(
            "refresh_token",
            json!({ "refresh_token": refresh_token.expose() }),
        )
        .await
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for SupabaseClient {
    async fn find_profile(
        &self,
        token: &AccessToken,
        user_id: UserId,
    ) -> PortalResult<Option<Profile>> {
        let url = self.rest_url(&format!("/profiles?select=*&id=eq.{}", user_id));
        let rows: Vec<ProfileRow> =
            Self::send_json(self.request(Method::GET, url, Some(token))).await?;
        Ok(rows.into_iter().next().map(Profile::from))
    }

    async fn list_profiles(&self, token: &AccessToken) -> PortalResult<Vec<Profile>> {
        let url = self.rest_url("/profiles?select=*&order=created_at.asc");
        let rows: Vec<ProfileRow> =
            Self::send_json(self.request(Method::GET, url, Some(token))).await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn update_global_role(
        &self,
        token: &AccessToken,
        user_id: UserId,
        role: GlobalRole,
    ) -> PortalResult<()> {
        self.patch_profile(token, user_id, json!({ "global_role": role.code() }))
            .await
    }

    async fn update_full_name(
        &self,
        token: &AccessToken,
        user_id: UserId,
        full_name: Option<&str>,
    ) -> PortalResult<()> {
        self.patch_profile(token, user_id, json!({ "full_name": full_name }))
            .await
    }
}

impl SupabaseClient {
    /// Row-level security turns a forbidden update into zero rows, not an
    /// error; asking for the rows back makes that visible.
    async fn patch_profile(
        &self,
        token: &AccessToken,
        user_id: UserId,
        body: serde_json::Value,
    ) -> PortalResult<()> {
        let url = self.rest_url(&format!("/profiles?id=eq.{}", user_id));
        let rows: Vec<ProfileRow> = Self::send_json(
            self.request(Method::PATCH, url, Some(token))
                .header("Prefer", "return=representation")
                .json(&body),
        )
        .await?;

        require_rows(rows, || PortalError::ProfileNotFound).map(drop)
    }
}

// ============================================================================
// App Access Repository Implementation
// ============================================================================

impl AppAccessRepository for SupabaseClient {
    async fn list_grants(&self, token: &AccessToken) -> PortalResult<Vec<AppAccessGrant>> {
        let url = self.rest_url("/app_access?select=*");
        let rows: Vec<AppAccessRow> =
            Self::send_json(self.request(Method::GET, url, Some(token))).await?;
        Ok(into_grants(rows))
    }

    async fn list_grants_for_user(
        &self,
        token: &AccessToken,
        user_id: UserId,
    ) -> PortalResult<Vec<AppAccessGrant>> {
        let url = self.rest_url(&format!("/app_access?select=*&user_id=eq.{}", user_id));
        let rows: Vec<AppAccessRow> =
            Self::send_json(self.request(Method::GET, url, Some(token))).await?;
        Ok(into_grants(rows))
    }

    async fn upsert_grant(
        &self,
        token: &AccessToken,
        grant: &NewGrant,
    ) -> PortalResult<AppAccessGrant> {
        let url = self.rest_url("/app_access?on_conflict=user_id,app_id");
        let body = json!([{
            "user_id": grant.user_id,
            "app_id": grant.app_id.code(),
            "role": grant.role.to_string(),
            "granted_by": grant.granted_by,
        }]);

        let rows: Vec<AppAccessRow> = Self::send_json(
            self.request(Method::POST, url, Some(token))
                .header("Prefer", "resolution=merge-duplicates,return=representation")
                .json(&body),
        )
        .await?;

        rows.into_iter()
            .next()
            .and_then(AppAccessRow::into_grant)
            .ok_or_else(|| PortalError::Decode("upsert returned no row".to_string()))
    }

    async fn delete_grant(
        &self,
        token: &AccessToken,
        user_id: UserId,
        app_id: AppId,
    ) -> PortalResult<()> {
        let url = self.rest_url(&format!(
            "/app_access?user_id=eq.{}&app_id=eq.{}",
            user_id,
            app_id.code()
        ));
        let rows: Vec<AppAccessRow> = Self::send_json(
            self.request(Method::DELETE, url, Some(token))
                .header("Prefer", "return=representation"),
        )
        .await?;

        require_rows(rows, || PortalError::provider(404, GRANT_NOT_FOUND)).map(drop)
    }
}

/// Row-level security filters a write down to zero rows and PostgREST
/// still answers 2xx; no rows back means nothing was written.
fn require_rows<T>(rows: Vec<T>, missing: impl FnOnce() -> PortalError) -> PortalResult<Vec<T>> {
    if rows.is_empty() {
        return Err(missing());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_field_precedence() {
        assert_eq!(
            provider_message(r#"{"code":400,"msg":"Invalid login credentials"}"#).as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(
            provider_message(r#"{"error":"invalid_grant","error_description":"Refresh Token Not Found"}"#)
                .as_deref(),
            Some("Refresh Token Not Found")
        );
        assert_eq!(
            provider_message(r#"{"message":"new row violates row-level security policy"}"#)
                .as_deref(),
            Some("new row violates row-level security policy")
        );
        assert_eq!(provider_message("<html>bad gateway</html>"), None);
        assert_eq!(provider_message(r#"{"msg":""}"#), None);
    }

    #[test]
    fn test_user_metadata_full_name() {
        let user: UserBody = serde_json::from_str(
            r#"{"id":"7f1c0d5e-8a2b-4c3d-9e4f-0a1b2c3d4e5f","email":"ana@example.com","user_metadata":{"full_name":"Ana"}}"#,
        )
        .unwrap();
        let identity = user.into_identity();
        assert_eq!(identity.email.as_str(), "ana@example.com");
        assert_eq!(identity.full_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_profile_row_role_defaults() {
        let row: ProfileRow = serde_json::from_str(
            r#"{"id":"7f1c0d5e-8a2b-4c3d-9e4f-0a1b2c3d4e5f","email":"a@b.co","full_name":null,"global_role":null,"created_at":"2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(Profile::from(row).global_role, GlobalRole::Member);
    }

    #[test]
    fn test_unknown_app_rows_are_skipped() {
        let rows: Vec<AppAccessRow> = serde_json::from_str(
            r#"[
                {"id":"00000000-0000-4000-8000-000000000001","user_id":"00000000-0000-4000-8000-000000000002","app_id":"eximia-os","role":"editor","granted_by":null},
                {"id":"00000000-0000-4000-8000-000000000003","user_id":"00000000-0000-4000-8000-000000000002","app_id":"retired-app","role":"viewer","granted_by":null}
            ]"#,
        )
        .unwrap();
        let grants = into_grants(rows);
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].app_id, AppId::EximiaOs);
        assert_eq!(grants[0].role, AppRole::Editor);
    }

    #[test]
    fn test_write_filtered_to_no_rows_is_an_error() {
        let none: Vec<AppAccessRow> = Vec::new();
        let err = require_rows(none, || PortalError::provider(404, GRANT_NOT_FOUND)).unwrap_err();
        assert!(matches!(err, PortalError::Provider { status: 404, .. }));
        assert_eq!(err.to_string(), "Access grant not found");

        let rows: Vec<AppAccessRow> = serde_json::from_str(
            r#"[{"id":"00000000-0000-4000-8000-000000000001","user_id":"00000000-0000-4000-8000-000000000002","app_id":"eximia-os","role":"editor","granted_by":null}]"#,
        )
        .unwrap();
        assert_eq!(
            require_rows(rows, || PortalError::ProfileNotFound).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_urls() {
        let client = SupabaseClient::new("https://abc.supabase.co/", "anon").unwrap();
        assert_eq!(client.auth_url("/user"), "https://abc.supabase.co/auth/v1/user");
        assert_eq!(
            client.rest_url("/profiles"),
            "https://abc.supabase.co/rest/v1/profiles"
        );
    }
}
