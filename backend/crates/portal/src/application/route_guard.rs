//! Route Guard
//!
//! Per-request decision: let the request through, send an anonymous
//! visitor to the login form, or send a signed-in user away from it.
//! Pure over the path and whether a session was confirmed; resolving the
//! session is [`super::resolve_session`]'s job.

use platform::redirect::{append_query, path_and_query};

use crate::application::config::GuardConfig;

const STATIC_PREFIX: &str = "/static/";
const FAVICON: &str = "/favicon.ico";
const STATIC_EXTENSIONS: [&str; 6] = ["svg", "png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    PassThrough,
    /// `location` carries the original path and query as `redirect=`
    RedirectToLogin { location: String },
    /// Signed-in user on a sign-in form
    RedirectAfterLogin { location: String },
}

/// `route` matches itself and anything below it on a `/` boundary.
/// `/` only matches itself.
fn route_matches(route: &str, path: &str) -> bool {
    if path == route {
        return true;
    }
    if route == "/" {
        return false;
    }
    let Some(rest) = path.strip_prefix(route.trim_end_matches('/')) else {
        return false;
    };
    rest.starts_with('/')
}

/// Assets never go through the guard (no provider call for an icon).
pub fn is_static_asset(path: &str) -> bool {
    if path.starts_with(STATIC_PREFIX) || path == FAVICON {
        return true;
    }
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty() && STATIC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
    })
}

impl GuardConfig {
    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.iter().any(|route| route_matches(route, path))
    }

    pub fn is_auth_route(&self, path: &str) -> bool {
        self.auth_routes.iter().any(|route| route_matches(route, path))
    }

    pub fn decide(&self, path: &str, query: Option<&str>, authenticated: bool) -> GuardDecision {
        if is_static_asset(path) || self.is_public(path) {
            return GuardDecision::PassThrough;
        }

        if self.is_auth_route(path) {
            return if authenticated {
                GuardDecision::RedirectAfterLogin {
                    location: self.after_login_url.clone(),
                }
            } else {
                GuardDecision::PassThrough
            };
        }

        if authenticated {
            GuardDecision::PassThrough
        } else {
            GuardDecision::RedirectToLogin {
                location: append_query(&self.login_url, "redirect", &path_and_query(path, query)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> GuardConfig {
        GuardConfig::default()
    }

    #[test]
    fn test_public_routes_always_pass() {
        let guard = guard();
        for path in ["/", "/health", "/auth/callback", "/auth/signout", "/auth/password/reset"] {
            for authenticated in [true, false] {
                assert_eq!(
                    guard.decide(path, None, authenticated),
                    GuardDecision::PassThrough,
                    "{path} authenticated={authenticated}"
                );
            }
        }
    }

    #[test]
    fn test_auth_routes_redirect_signed_in_users() {
        let guard = guard();
        for path in ["/login", "/signup", "/forgot-password", "/reset-password"] {
            assert_eq!(
                guard.decide(path, None, true),
                GuardDecision::RedirectAfterLogin {
                    location: "/apps".to_string()
                }
            );
            assert_eq!(guard.decide(path, None, false), GuardDecision::PassThrough);
        }
    }

    #[test]
    fn test_protected_routes_keep_destination() {
        let guard = guard();
        assert_eq!(
            guard.decide("/admin/users", Some("page=2"), false),
            GuardDecision::RedirectToLogin {
                location: "/login?redirect=%2Fadmin%2Fusers%3Fpage%3D2".to_string()
            }
        );
        assert_eq!(guard.decide("/apps", None, true), GuardDecision::PassThrough);
    }

    #[test]
    fn test_root_is_not_a_prefix() {
        let guard = guard();
        assert!(guard.is_public("/"));
        assert!(!guard.is_public("/apps"));
        assert!(matches!(
            guard.decide("/apps", None, false),
            GuardDecision::RedirectToLogin { .. }
        ));
    }

    #[test]
    fn test_prefix_matching_respects_segments() {
        assert!(route_matches("/login", "/login"));
        assert!(route_matches("/login", "/login/magic"));
        assert!(!route_matches("/login", "/loginx"));
        assert!(route_matches("/auth/callback", "/auth/callback/"));
    }

    #[test]
    fn test_public_wins_over_auth_route() {
        let guard = GuardConfig {
            public_routes: vec!["/login".to_string()],
            ..GuardConfig::default()
        };
        assert_eq!(guard.decide("/login", None, true), GuardDecision::PassThrough);
    }

    #[test]
    fn test_static_assets_bypass() {
        let guard = guard();
        for path in ["/favicon.ico", "/static/app.css", "/logo.svg", "/img/hero.JPG"] {
            assert!(is_static_asset(path), "{path}");
            assert_eq!(guard.decide(path, None, false), GuardDecision::PassThrough);
        }
        assert!(!is_static_asset("/apps"));
        assert!(!is_static_asset("/admin/users.json"));
    }
}
