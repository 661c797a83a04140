use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Role a user holds inside one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppRole {
    #[display("admin")]
    Admin,
    #[display("editor")]
    Editor,
    /// What the "grant access" button hands out.
    #[default]
    #[display("viewer")]
    Viewer,
}

impl AppRole {
    pub const ALL: [AppRole; 3] = [AppRole::Admin, AppRole::Editor, AppRole::Viewer];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.to_string() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grant_is_viewer() {
        assert_eq!(AppRole::default(), AppRole::Viewer);
    }

    #[test]
    fn test_codes() {
        assert_eq!(AppRole::Editor.to_string(), "editor");
        assert_eq!(AppRole::from_code("admin"), Some(AppRole::Admin));
        assert_eq!(AppRole::from_code("owner"), None);
    }
}
