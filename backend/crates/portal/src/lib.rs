//! eximIA Auth Portal
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, access rules, provider traits
//! - `application/` - Configuration, route guard, use cases
//! - `infra/` - Supabase client and an in-memory provider
//! - `presentation/` - HTTP handlers, DTOs, guard middleware, router
//!
//! ## Features
//! - Sign in / sign up / password recovery against Supabase (PKCE code flow)
//! - Route guard in front of every page, fail closed
//! - Application catalog with per-application access
//! - Admin console: per-application roles and global roles
//!
//! ## Access Model
//! - `owner` and `admin` global roles open every application
//! - Everyone else needs an `app_access` row for the application

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::PortalConfig;
pub use error::{PortalError, PortalResult};
pub use infra::memory::InMemoryProvider;
pub use infra::supabase::SupabaseClient;
pub use presentation::router::{portal_router, portal_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
