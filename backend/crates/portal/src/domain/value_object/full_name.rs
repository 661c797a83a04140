use crate::error::{PortalError, PortalResult};

const FULL_NAME_MAX_LENGTH: usize = 120;

/// Display name edited on the profile page. Blank input clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(Option<String>);

impl FullName {
    pub fn new(raw: &str) -> PortalResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self(None));
        }
        if trimmed.chars().count() > FULL_NAME_MAX_LENGTH {
            return Err(PortalError::Validation(format!(
                "Name must be at most {} characters",
                FULL_NAME_MAX_LENGTH
            )));
        }
        Ok(Self(Some(trimmed.to_string())))
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_clears() {
        assert_eq!(FullName::new("  Ana Souza ").unwrap().as_deref(), Some("Ana Souza"));
        assert_eq!(FullName::new("   ").unwrap().as_deref(), None);
    }

    #[test]
    fn test_rejects_overlong() {
        assert!(FullName::new(&"x".repeat(121)).is_err());
    }
}
