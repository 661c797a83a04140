//! Application Layer
//!
//! Configuration, the route guard, and use cases.

pub mod access_admin;
pub mod auth_callback;
pub mod catalog;
pub mod config;
pub mod password_reset;
pub mod profile;
pub mod resolve_session;
pub mod route_guard;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use access_admin::AccessAdminUseCase;
pub use auth_callback::{AuthCallbackOutcome, AuthCallbackUseCase};
pub use catalog::{CatalogOutput, CatalogUseCase};
pub use config::{GuardConfig, PortalConfig, SessionCookieConfig};
pub use password_reset::{
    RequestPasswordResetOutput, RequestPasswordResetUseCase, ResetPasswordInput,
    ResetPasswordOutput, ResetPasswordUseCase,
};
pub use profile::ProfileUseCase;
pub use resolve_session::{
    AuthenticatedUser, ResolveSessionUseCase, ResolvedSession, SessionContext,
};
pub use route_guard::GuardDecision;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
