//! Redirect helpers
//!
//! Redirect targets coming from query parameters (`redirect`, `next`) are
//! user-controlled. Only same-origin relative paths are followed.

/// Return `candidate` if it is a same-origin relative path, else `fallback`.
///
/// Accepted: `/apps`, `/admin/users?x=1`. Rejected: empty, `//evil.com`,
/// `/\evil.com`, `https://evil.com`, `apps`.
pub fn safe_redirect_target(candidate: Option<&str>, fallback: &str) -> String {
    match candidate {
        Some(path) if is_relative_path(path) => path.to_string(),
        _ => fallback.to_string(),
    }
}

fn is_relative_path(path: &str) -> bool {
    let mut chars = path.chars();
    if chars.next() != Some('/') {
        return false;
    }
    !matches!(chars.next(), Some('/') | Some('\\'))
        && !path.chars().any(|c| c.is_control())
}

/// Append `key=value` to `base`, percent-encoding the value.
pub fn append_query(base: &str, key: &str, value: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!(
        "{}{}{}={}",
        base,
        separator,
        key,
        urlencoding::encode(value)
    )
}

/// Join a path with its optional raw query string.
pub fn path_and_query(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{}?{}", path, query),
        _ => path.to_string(),
    }
}

/// Join an origin (`https://auth.example.com`) with an absolute path.
pub fn join_origin(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}
