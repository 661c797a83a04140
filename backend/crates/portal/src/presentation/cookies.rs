//! Session Cookies
//!
//! Reading and writing the provider session and the PKCE verifier.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use platform::cookie::{extract_cookie, to_header_value};

use crate::application::config::SessionCookieConfig;
use crate::domain::entity::session::ProviderSession;
use crate::domain::value_object::token::{AccessToken, RefreshToken};

/// Tokens found on a request
pub fn read_session_tokens(
    headers: &HeaderMap,
    config: &SessionCookieConfig,
) -> (Option<AccessToken>, Option<RefreshToken>) {
    (
        extract_cookie(headers, &config.access_cookie_name).map(AccessToken::new),
        extract_cookie(headers, &config.refresh_cookie_name).map(RefreshToken::new),
    )
}

pub fn read_code_verifier(headers: &HeaderMap, config: &SessionCookieConfig) -> Option<String> {
    extract_cookie(headers, &config.verifier_cookie_name)
}

pub fn session_cookies(
    config: &SessionCookieConfig,
    session: &ProviderSession,
) -> Vec<HeaderValue> {
    [
        config
            .access_cookie()
            .build_set_cookie(session.access_token.expose()),
        config
            .refresh_cookie()
            .build_set_cookie(session.refresh_token.expose()),
    ]
    .into_iter()
    .filter_map(to_header_value)
    .collect()
}

/// Session cookies plus the verifier, all expired
pub fn clear_session_cookies(config: &SessionCookieConfig) -> Vec<HeaderValue> {
    [
        config.access_cookie().build_delete_cookie(),
        config.refresh_cookie().build_delete_cookie(),
        config.verifier_cookie().build_delete_cookie(),
    ]
    .into_iter()
    .filter_map(to_header_value)
    .collect()
}

/// Access and refresh cookies, expired. The verifier is left alone so a
/// pending email link still completes.
pub fn clear_stale_session_cookies(config: &SessionCookieConfig) -> Vec<HeaderValue> {
    [
        config.access_cookie().build_delete_cookie(),
        config.refresh_cookie().build_delete_cookie(),
    ]
    .into_iter()
    .filter_map(to_header_value)
    .collect()
}

pub fn verifier_cookie(config: &SessionCookieConfig, verifier: &str) -> Vec<HeaderValue> {
    to_header_value(config.verifier_cookie().build_set_cookie(verifier))
        .into_iter()
        .collect()
}

pub fn clear_verifier_cookie(config: &SessionCookieConfig) -> Vec<HeaderValue> {
    to_header_value(config.verifier_cookie().build_delete_cookie())
        .into_iter()
        .collect()
}

/// Append `Set-Cookie` headers to any response.
pub fn with_cookies(response: impl IntoResponse, cookies: Vec<HeaderValue>) -> Response {
    let mut response = response.into_response();
    let headers = response.headers_mut();
    for cookie in cookies {
        headers.append(header::SET_COOKIE, cookie);
    }
    response
}

/// Append cookies the response does not already set.
///
/// Browsers apply `Set-Cookie` headers in order, so a later header for the
/// same name would override what the handler wrote.
pub fn with_missing_cookies(response: Response, cookies: Vec<HeaderValue>) -> Response {
    let already_set: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(cookie_name)
        .collect();

    let cookies = cookies
        .into_iter()
        .filter(|cookie| cookie_name(cookie).is_none_or(|name| !already_set.contains(&name)))
        .collect();
    with_cookies(response, cookies)
}

fn cookie_name(value: &HeaderValue) -> Option<String> {
    let (name, _) = value.to_str().ok()?.split_once('=')?;
    Some(name.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::PortalConfig;

    #[test]
    fn test_read_session_tokens() {
        let config = PortalConfig::development().cookies;
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("sb-access-token=abc; sb-refresh-token=def"),
        );

        let (access, refresh) = read_session_tokens(&headers, &config);
        assert_eq!(access.unwrap().expose(), "abc");
        assert_eq!(refresh.unwrap().expose(), "def");
        assert_eq!(read_code_verifier(&headers, &config), None);
    }

    #[test]
    fn test_clear_expires_all_three() {
        let config = PortalConfig::production().cookies;
        let cleared = clear_session_cookies(&config);
        assert_eq!(cleared.len(), 3);
        for cookie in cleared {
            let cookie = cookie.to_str().unwrap();
            assert!(cookie.contains("Max-Age=0"));
            assert!(cookie.contains("Domain=.eximia.app"));
        }
    }

    #[test]
    fn test_missing_cookies_keep_handler_cookies_last() {
        let config = PortalConfig::development().cookies;
        let fresh = to_header_value(config.access_cookie().build_set_cookie("fresh")).unwrap();
        let response = with_cookies((), vec![fresh]);

        let response = with_missing_cookies(response, clear_stale_session_cookies(&config));

        let cookies: Vec<&str> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("sb-access-token=fresh"));
        assert!(cookies[1].starts_with("sb-refresh-token=;"));
    }

    #[test]
    fn test_stale_clear_keeps_verifier() {
        let config = PortalConfig::development().cookies;
        let cleared = clear_stale_session_cookies(&config);
        assert_eq!(cleared.len(), 2);
        assert!(
            cleared
                .iter()
                .all(|cookie| !cookie.to_str().unwrap().starts_with("sb-code-verifier"))
        );
    }
}
