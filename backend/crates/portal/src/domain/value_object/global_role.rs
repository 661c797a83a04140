//! Global Role Value Object
//!
//! Account-wide authorization level stored on the profile.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account-wide role, most privileged first.
///
/// `Owner` and `Admin` are both "global admin": unconditional access to
/// every application, and the right to use the admin console.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GlobalRole {
    Owner,
    Admin,
    #[default]
    Member,
    Viewer,
}

impl GlobalRole {
    pub const ALL: [GlobalRole; 4] = [
        GlobalRole::Owner,
        GlobalRole::Admin,
        GlobalRole::Member,
        GlobalRole::Viewer,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use GlobalRole::*;
        match self {
            Owner => "owner",
            Admin => "admin",
            Member => "member",
            Viewer => "viewer",
        }
    }

    #[inline]
    pub const fn is_global_admin(&self) -> bool {
        matches!(self, GlobalRole::Owner | GlobalRole::Admin)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    /// Interpret the role column of a stored profile.
    ///
    /// A missing value means `member`; an unrecognised one is demoted to
    /// `viewer` so that bad data never grants access.
    pub fn from_stored(code: Option<&str>) -> Self {
        match code {
            None => GlobalRole::Member,
            Some(code) => Self::from_code(code).unwrap_or_else(|| {
                tracing::warn!(role = code, "Unknown global role on profile, treating as viewer");
                GlobalRole::Viewer
            }),
        }
    }
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_admin_set() {
        assert!(GlobalRole::Owner.is_global_admin());
        assert!(GlobalRole::Admin.is_global_admin());
        assert!(!GlobalRole::Member.is_global_admin());
        assert!(!GlobalRole::Viewer.is_global_admin());
    }

    #[test]
    fn test_ordering_follows_privilege() {
        assert!(GlobalRole::Owner < GlobalRole::Admin);
        assert!(GlobalRole::Admin < GlobalRole::Member);
        assert!(GlobalRole::Member < GlobalRole::Viewer);
    }

    #[test]
    fn test_from_code_roundtrips_display() {
        for role in GlobalRole::ALL {
            assert_eq!(GlobalRole::from_code(&role.to_string()), Some(role));
        }
        assert_eq!(GlobalRole::from_code("super_admin"), None);
    }

    #[test]
    fn test_from_stored_defaults() {
        assert_eq!(GlobalRole::from_stored(None), GlobalRole::Member);
        assert_eq!(GlobalRole::from_stored(Some("admin")), GlobalRole::Admin);
        assert_eq!(GlobalRole::from_stored(Some("root")), GlobalRole::Viewer);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&GlobalRole::Owner).unwrap();
        assert_eq!(json, r#""owner""#);
        let role: GlobalRole = serde_json::from_str(r#""viewer""#).unwrap();
        assert_eq!(role, GlobalRole::Viewer);
    }
}
