//! Platform Crate - Technical Infrastructure
//!
//! Web plumbing shared by the portal:
//! - Cookie building and parsing (domain-scoped session cookies)
//! - Redirect target sanitising and query building
//! - PKCE verifier/challenge generation (SHA-256, Base64url)

pub mod cookie;
pub mod crypto;
pub mod redirect;
