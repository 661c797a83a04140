//! New Password Value Object
//!
//! Checks applied before a password ever reaches the provider. The
//! provider may apply stricter rules of its own; its message is shown
//! verbatim in that case.

use crate::error::{PortalError, PortalResult};

pub const PASSWORD_MIN_LENGTH: usize = 6;

/// A password chosen on sign up or reset, already confirmed.
pub struct NewPassword(String);

impl NewPassword {
    /// Confirmation mismatch is reported before length.
    pub fn new(password: String, confirmation: &str) -> PortalResult<Self> {
        if password != confirmation {
            return Err(PortalError::Validation("Passwords do not match".to_string()));
        }

        if password.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(PortalError::Validation(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN_LENGTH
            )));
        }

        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NewPassword(***)")
    }
}
