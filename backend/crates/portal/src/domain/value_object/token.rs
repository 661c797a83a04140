//! Provider session tokens
//!
//! Opaque to this crate: only the provider can tell whether they are valid.

use std::fmt;

/// Bearer token identifying the acting session on every provider call.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

/// Long-lived token exchanged for a fresh access token.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

macro_rules! opaque_token {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn expose(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(***)", stringify!($name))
            }
        }
    };
}

opaque_token!(AccessToken);
opaque_token!(RefreshToken);
