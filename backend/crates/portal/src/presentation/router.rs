//! Portal Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::PortalConfig;
use crate::domain::repository::PortalProvider;
use crate::infra::supabase::SupabaseClient;
use crate::presentation::handlers::{self, PortalAppState};
use crate::presentation::middleware::route_guard;
use crate::presentation::pages;

/// Create the portal router backed by a Supabase project
pub fn portal_router(client: SupabaseClient, config: PortalConfig) -> Router {
    portal_router_generic(client, config)
}

/// Create a portal router for any provider implementation
pub fn portal_router_generic<P>(provider: P, config: PortalConfig) -> Router
where
    P: PortalProvider,
{
    let state = PortalAppState {
        provider: Arc::new(provider),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(handlers::home::<P>))
        .route("/health", get(handlers::health))
        // Auth pages
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
        .route("/forgot-password", get(handlers::forgot_password_page))
        .route("/reset-password", get(handlers::reset_password_page))
        // Auth actions
        .route("/auth/signin", post(handlers::sign_in::<P>))
        .route("/auth/signup", post(handlers::sign_up::<P>))
        .route("/auth/recover", post(handlers::recover::<P>))
        .route("/auth/password/reset", post(handlers::reset_password::<P>))
        .route("/auth/callback", get(handlers::auth_callback::<P>))
        .route("/auth/signout", post(handlers::sign_out::<P>))
        // Signed-in pages
        .route("/apps", get(pages::catalog::<P>))
        .route(
            "/profile",
            get(pages::profile::<P>).put(pages::update_profile::<P>),
        )
        .route("/admin/users", get(pages::admin_users::<P>))
        .route(
            "/admin/users/{user_id}/access/{app_id}",
            put(pages::grant_access::<P>).delete(pages::revoke_access::<P>),
        )
        .route("/admin/users/{user_id}/role", put(pages::change_global_role::<P>))
        .layer(middleware::from_fn_with_state(state.clone(), route_guard::<P>))
        .with_state(state)
}
