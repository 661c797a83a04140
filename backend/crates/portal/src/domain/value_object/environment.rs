use serde::{Deserialize, Serialize};

/// Deployment environment; selects application base URLs and cookie security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Environment::from_code("production"), Some(Environment::Production));
        assert_eq!(Environment::from_code(" DEV "), Some(Environment::Development));
        assert_eq!(Environment::from_code("staging"), None);
    }
}
