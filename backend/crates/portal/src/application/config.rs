//! Application Configuration
//!
//! Configuration for the portal application layer. Built once at process
//! start and shared read-only.

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::domain::value_object::{app_id::AppId, environment::Environment};

/// Route lists and redirect targets for the guard
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Always reachable, with or without a session
    pub public_routes: Vec<String>,
    /// Sign-in forms; a signed-in user is sent to `after_login_url`
    pub auth_routes: Vec<String>,
    pub login_url: String,
    pub after_login_url: String,
    /// Tag identifying this application in logs
    pub app_id: AppId,
}

impl Default for GuardConfig {
    fn default() -> Self {
        let routes = |paths: &[&str]| paths.iter().map(|p| p.to_string()).collect();
        Self {
            public_routes: routes(&[
                "/",
                "/health",
                "/auth/callback",
                "/auth/signout",
                "/auth/signin",
                "/auth/signup",
                "/auth/recover",
                "/auth/password/reset",
            ]),
            auth_routes: routes(&["/login", "/signup", "/forgot-password", "/reset-password"]),
            login_url: "/login".to_string(),
            after_login_url: "/apps".to_string(),
            app_id: AppId::AuthPortal,
        }
    }
}

/// Cookies holding the provider session
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    /// PKCE verifier between an email request and the link coming back
    pub verifier_cookie_name: String,
    /// Shared parent domain so sibling apps see the session. `None` = host-only.
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
    /// Session cookie lifetime (1 week)
    pub session_ttl: Duration,
    /// Verifier cookie lifetime (1 hour, the provider's link lifetime)
    pub verifier_ttl: Duration,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            access_cookie_name: "sb-access-token".to_string(),
            refresh_cookie_name: "sb-refresh-token".to_string(),
            verifier_cookie_name: "sb-code-verifier".to_string(),
            domain: Some(".eximia.app".to_string()),
            secure: true,
            same_site: SameSite::Lax,
            session_ttl: Duration::from_secs(7 * 24 * 3600),
            verifier_ttl: Duration::from_secs(3600),
        }
    }
}

impl SessionCookieConfig {
    fn cookie(&self, name: &str, ttl: Duration) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            domain: self.domain.clone(),
            secure: self.secure,
            http_only: true,
            same_site: self.same_site,
            path: "/".to_string(),
            max_age_secs: Some(ttl.as_secs() as i64),
        }
    }

    pub fn access_cookie(&self) -> CookieConfig {
        self.cookie(&self.access_cookie_name, self.session_ttl)
    }

    pub fn refresh_cookie(&self) -> CookieConfig {
        self.cookie(&self.refresh_cookie_name, self.session_ttl)
    }

    pub fn verifier_cookie(&self) -> CookieConfig {
        self.cookie(&self.verifier_cookie_name, self.verifier_ttl)
    }
}

/// Portal application configuration
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub environment: Environment,
    /// Origin the browser uses to reach the portal; email links point here
    pub public_origin: String,
    pub guard: GuardConfig,
    pub cookies: SessionCookieConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl PortalConfig {
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            public_origin: "https://auth.eximia.app".to_string(),
            guard: GuardConfig::default(),
            cookies: SessionCookieConfig::default(),
        }
    }

    /// Create config for development (insecure, host-only cookies)
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            public_origin: "http://localhost:3100".to_string(),
            guard: GuardConfig::default(),
            cookies: SessionCookieConfig {
                domain: None,
                secure: false,
                ..SessionCookieConfig::default()
            },
        }
    }

    /// Confirmation links land on the code-exchange route
    pub fn email_callback_url(&self) -> String {
        platform::redirect::join_origin(&self.public_origin, "/auth/callback")
    }

    /// Recovery links land on the reset form with `?code=`
    pub fn password_reset_url(&self) -> String {
        platform::redirect::join_origin(&self.public_origin, "/reset-password")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_cookies_are_host_only_and_insecure() {
        let config = PortalConfig::development();
        let cookie = config.cookies.access_cookie().build_set_cookie("t");
        assert!(!cookie.contains("Domain="));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_production_cookies_share_parent_domain() {
        let config = PortalConfig::production();
        let cookie = config.cookies.refresh_cookie().build_set_cookie("t");
        assert!(cookie.starts_with("sb-refresh-token=t"));
        assert!(cookie.contains("Domain=.eximia.app"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[test]
    fn test_email_urls() {
        let config = PortalConfig {
            public_origin: "https://auth.example.com/".to_string(),
            ..PortalConfig::production()
        };
        assert_eq!(config.email_callback_url(), "https://auth.example.com/auth/callback");
        assert_eq!(config.password_reset_url(), "https://auth.example.com/reset-password");
    }
}
