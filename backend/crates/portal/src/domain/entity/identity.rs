//! User Identity Entity
//!
//! The provider's view of an authenticated user.

use kernel::id::UserId;

use crate::domain::value_object::email::Email;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: UserId,
    pub email: Email,
    /// `full_name` from the user metadata written at sign up
    pub full_name: Option<String>,
}
