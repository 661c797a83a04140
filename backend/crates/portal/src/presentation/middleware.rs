//! Route Guard Middleware
//!
//! Resolves the session once per request, applies the guard decision and
//! hands the [`SessionContext`] to handlers through request extensions.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::application::route_guard::{GuardDecision, is_static_asset};
use crate::application::{ResolveSessionUseCase, SessionContext};
use crate::domain::repository::PortalProvider;
use crate::presentation::cookies::{
    clear_stale_session_cookies, read_session_tokens, session_cookies, with_missing_cookies,
};
use crate::presentation::handlers::PortalAppState;

pub async fn route_guard<P>(
    State(state): State<PortalAppState<P>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    P: PortalProvider,
{
    let path = req.uri().path().to_string();
    if is_static_asset(&path) {
        req.extensions_mut().insert(SessionContext::anonymous());
        return next.run(req).await;
    }
    let query = req.uri().query().map(str::to_string);

    let cookie_config = &state.config.cookies;
    let (access_token, refresh_token) = read_session_tokens(req.headers(), cookie_config);
    let had_cookies = access_token.is_some() || refresh_token.is_some();

    let use_case = ResolveSessionUseCase::new(state.provider.clone());
    let resolved = use_case.execute(access_token, refresh_token).await;

    let authenticated = resolved.context.is_authenticated();
    let cookies = match &resolved.refreshed {
        Some(session) => session_cookies(cookie_config, session),
        // Stale cookies: drop them so the next request skips the provider
        None if had_cookies && !authenticated => clear_stale_session_cookies(cookie_config),
        None => Vec::new(),
    };

    let decision = state
        .config
        .guard
        .decide(&path, query.as_deref(), authenticated);

    tracing::debug!(
        app_id = %state.config.guard.app_id,
        path = %path,
        authenticated,
        decision = ?decision,
        "Route guard"
    );

    let response = match decision {
        GuardDecision::PassThrough => {
            req.extensions_mut().insert::<SessionContext>(resolved.context);
            next.run(req).await
        }
        GuardDecision::RedirectToLogin { location }
        | GuardDecision::RedirectAfterLogin { location } => {
            Redirect::temporary(&location).into_response()
        }
    };

    // Cookies written by the handler (sign in, callback, reset) win
    with_missing_cookies(response, cookies)
}
