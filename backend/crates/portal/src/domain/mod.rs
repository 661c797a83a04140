//! Domain Layer
//!
//! Entities, value objects, the pure access rules and the provider traits.

pub mod access;
pub mod catalog;
pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use access::{AccessCell, AccessMatrix, UserAccessRow, effective_access};
pub use repository::{AppAccessRepository, IdentityProvider, PortalProvider, ProfileRepository};
