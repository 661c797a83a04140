//! Profile Entity
//!
//! One row per identity in the provider's `profiles` table. The global
//! role lives here, not in the identity.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::global_role::GlobalRole;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub global_role: GlobalRole,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Name shown in headers: full name if set, else the email.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }

    #[inline]
    pub fn is_global_admin(&self) -> bool {
        self.global_role.is_global_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(full_name: Option<&str>) -> Profile {
        Profile {
            id: UserId::new(),
            email: "ana@example.com".to_string(),
            full_name: full_name.map(str::to_string),
            global_role: GlobalRole::Member,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(profile(Some("Ana")).display_name(), "Ana");
        assert_eq!(profile(Some("  ")).display_name(), "ana@example.com");
        assert_eq!(profile(None).display_name(), "ana@example.com");
    }
}
