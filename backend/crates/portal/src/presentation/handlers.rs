//! HTTP Handlers: authentication flows
//!
//! Form posts live under `/auth/*`, which the guard treats as public, so
//! a recovery link can complete while no session exists yet.

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::config::PortalConfig;
use crate::application::{
    AuthCallbackOutcome, AuthCallbackUseCase, RequestPasswordResetUseCase, ResetPasswordInput,
    ResetPasswordUseCase, SessionContext, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::repository::PortalProvider;
use crate::error::PortalResult;
use crate::presentation::cookies::{
    clear_session_cookies, clear_verifier_cookie, read_code_verifier, session_cookies,
    verifier_cookie, with_cookies,
};
use crate::presentation::dto::{
    AuthCallbackQuery, AuthPageQuery, AuthPageResponse, HealthResponse, MessageResponse,
    PasswordResetRequest, RecoverRequest, RedirectResponse, SignInRequest, SignInResponse,
    SignUpRequest,
};

/// Shared state for portal handlers
#[derive(Clone)]
pub struct PortalAppState<P>
where
    P: PortalProvider,
{
    pub provider: Arc<P>,
    pub config: Arc<PortalConfig>,
}

// ============================================================================
// Health / Home
// ============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /
pub async fn home<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
) -> Redirect
where
    P: PortalProvider,
{
    let guard = &state.config.guard;
    if session.is_authenticated() {
        Redirect::temporary(&guard.after_login_url)
    } else {
        Redirect::temporary(&guard.login_url)
    }
}

// ============================================================================
// Auth pages
// ============================================================================

fn auth_page(page: &'static str, query: AuthPageQuery) -> Json<AuthPageResponse> {
    Json(AuthPageResponse {
        page,
        redirect: query.redirect,
        error: query.error,
        code: query.code,
    })
}

/// GET /login
pub async fn login_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPageResponse> {
    auth_page("login", query)
}

/// GET /signup
pub async fn signup_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPageResponse> {
    auth_page("signup", query)
}

/// GET /forgot-password
pub async fn forgot_password_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPageResponse> {
    auth_page("forgot-password", query)
}

/// GET /reset-password
pub async fn reset_password_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPageResponse> {
    auth_page("reset-password", query)
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /auth/signin
pub async fn sign_in<P>(
    State(state): State<PortalAppState<P>>,
    Json(req): Json<SignInRequest>,
) -> PortalResult<Response>
where
    P: PortalProvider,
{
    let use_case = SignInUseCase::new(state.provider.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
            redirect: req.redirect,
        })
        .await?;

    let cookies = session_cookies(&state.config.cookies, &output.session);

    Ok(with_cookies(
        Json(SignInResponse {
            user_id: output.session.user.id,
            redirect_to: output.redirect_to,
        }),
        cookies,
    ))
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<P>(
    State(state): State<PortalAppState<P>>,
    Json(req): Json<SignUpRequest>,
) -> PortalResult<Response>
where
    P: PortalProvider,
{
    let use_case = SignUpUseCase::new(state.provider.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
        })
        .await?;

    let message = format!(
        "We sent a confirmation link to {}. Follow it to activate your account.",
        output.email
    );

    Ok(with_cookies(
        Json(MessageResponse::new(message)),
        verifier_cookie(&state.config.cookies, &output.code_verifier),
    ))
}

// ============================================================================
// Password recovery
// ============================================================================

/// POST /auth/recover
pub async fn recover<P>(
    State(state): State<PortalAppState<P>>,
    Json(req): Json<RecoverRequest>,
) -> PortalResult<Response>
where
    P: PortalProvider,
{
    let use_case = RequestPasswordResetUseCase::new(state.provider.clone(), state.config.clone());
    let output = use_case.execute(req.email).await?;

    Ok(with_cookies(
        Json(MessageResponse::new(
            "If an account exists for this email, a reset link is on its way.",
        )),
        verifier_cookie(&state.config.cookies, &output.code_verifier),
    ))
}

/// POST /auth/password/reset
pub async fn reset_password<P>(
    State(state): State<PortalAppState<P>>,
    headers: HeaderMap,
    Json(req): Json<PasswordResetRequest>,
) -> PortalResult<Response>
where
    P: PortalProvider,
{
    let cookie_config = &state.config.cookies;
    let use_case = ResetPasswordUseCase::new(state.provider.clone(), state.config.clone());

    let output = use_case
        .execute(ResetPasswordInput {
            code: req.code,
            password: req.password,
            confirm_password: req.confirm_password,
            code_verifier: read_code_verifier(&headers, cookie_config),
        })
        .await?;

    let mut cookies = session_cookies(cookie_config, &output.session);
    cookies.extend(clear_verifier_cookie(cookie_config));

    Ok(with_cookies(
        Json(RedirectResponse {
            redirect_to: output.redirect_to,
        }),
        cookies,
    ))
}

// ============================================================================
// Auth callback
// ============================================================================

/// GET /auth/callback?code&next
pub async fn auth_callback<P>(
    State(state): State<PortalAppState<P>>,
    headers: HeaderMap,
    Query(query): Query<AuthCallbackQuery>,
) -> Response
where
    P: PortalProvider,
{
    let cookie_config = &state.config.cookies;
    let verifier = read_code_verifier(&headers, cookie_config);
    let use_case = AuthCallbackUseCase::new(state.provider.clone(), state.config.clone());

    match use_case
        .execute(query.code.as_deref(), verifier.as_deref(), query.next.as_deref())
        .await
    {
        AuthCallbackOutcome::SignedIn {
            session,
            redirect_to,
        } => {
            let mut cookies = session_cookies(cookie_config, &session);
            cookies.extend(clear_verifier_cookie(cookie_config));
            with_cookies(Redirect::temporary(&redirect_to), cookies)
        }
        AuthCallbackOutcome::Failed { redirect_to } => {
            Redirect::temporary(&redirect_to).into_response()
        }
    }
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /auth/signout
pub async fn sign_out<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
) -> Response
where
    P: PortalProvider,
{
    let use_case = SignOutUseCase::new(state.provider.clone());
    use_case
        .execute(session.user().map(|user| &user.access_token))
        .await;

    with_cookies(
        Redirect::to(&state.config.guard.login_url),
        clear_session_cookies(&state.config.cookies),
    )
}
