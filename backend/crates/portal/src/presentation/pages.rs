//! HTTP Handlers: signed-in pages
//!
//! Catalog, profile and the admin console.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::id::UserId;

use crate::application::profile::PROFILE_UPDATED;
use crate::application::{AccessAdminUseCase, CatalogUseCase, ProfileUseCase, SessionContext};
use crate::domain::repository::PortalProvider;
use crate::error::{PortalError, PortalResult};
use crate::presentation::dto::{
    AccessMatrixResponse, CatalogQuery, CatalogResponse, ChangeGlobalRoleRequest,
    GrantAccessRequest, ProfileResponse, UpdateProfileRequest, UpdateProfileResponse,
    UserAccessRowResponse,
};
use crate::presentation::handlers::PortalAppState;

// ============================================================================
// Catalog
// ============================================================================

/// GET /apps
pub async fn catalog<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<CatalogQuery>,
) -> PortalResult<Json<CatalogResponse>>
where
    P: PortalProvider,
{
    let user = session.require()?;
    let use_case = CatalogUseCase::new(state.provider.clone(), state.config.clone());

    let output = use_case.execute(user, query.no_access.as_deref()).await?;

    Ok(Json(output.into()))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /profile
pub async fn profile<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
) -> PortalResult<Json<ProfileResponse>>
where
    P: PortalProvider,
{
    let user = session.require()?;
    let profile = ProfileUseCase::new(state.provider.clone()).get(user).await?;

    Ok(Json(profile.into()))
}

/// PUT /profile
pub async fn update_profile<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> PortalResult<Json<UpdateProfileResponse>>
where
    P: PortalProvider,
{
    let user = session.require()?;
    let profile = ProfileUseCase::new(state.provider.clone())
        .update_full_name(user, &req.full_name)
        .await?;

    Ok(Json(UpdateProfileResponse {
        profile: profile.into(),
        message: PROFILE_UPDATED,
    }))
}

// ============================================================================
// Admin console
// ============================================================================

/// GET /admin/users
///
/// Redirects instead of erroring: anonymous to login, non-admins to the catalog.
pub async fn admin_users<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
) -> PortalResult<Response>
where
    P: PortalProvider,
{
    let guard = &state.config.guard;
    let Some(user) = session.user() else {
        return Ok(Redirect::temporary(&guard.login_url).into_response());
    };

    let use_case = AccessAdminUseCase::new(state.provider.clone());
    match use_case.load_matrix(user).await {
        Ok(matrix) => Ok(Json(AccessMatrixResponse::from(&matrix)).into_response()),
        Err(PortalError::NotGlobalAdmin) => {
            tracing::debug!(user_id = %user.identity.id, "Non-admin sent back to catalog");
            Ok(Redirect::temporary(&guard.after_login_url).into_response())
        }
        Err(e) => Err(e),
    }
}

/// PUT /admin/users/{user_id}/access/{app_id}
pub async fn grant_access<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
    Path((user_id, app_id)): Path<(UserId, String)>,
    Json(req): Json<GrantAccessRequest>,
) -> PortalResult<Json<UserAccessRowResponse>>
where
    P: PortalProvider,
{
    let actor = session.require()?;
    let row = AccessAdminUseCase::new(state.provider.clone())
        .grant(actor, user_id, &app_id, req.role)
        .await?;

    Ok(Json(UserAccessRowResponse::from(&row)))
}

/// DELETE /admin/users/{user_id}/access/{app_id}
pub async fn revoke_access<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
    Path((user_id, app_id)): Path<(UserId, String)>,
) -> PortalResult<Json<UserAccessRowResponse>>
where
    P: PortalProvider,
{
    let actor = session.require()?;
    let row = AccessAdminUseCase::new(state.provider.clone())
        .revoke(actor, user_id, &app_id)
        .await?;

    Ok(Json(UserAccessRowResponse::from(&row)))
}

/// PUT /admin/users/{user_id}/role
pub async fn change_global_role<P>(
    State(state): State<PortalAppState<P>>,
    Extension(session): Extension<SessionContext>,
    Path(user_id): Path<UserId>,
    Json(req): Json<ChangeGlobalRoleRequest>,
) -> PortalResult<Json<UserAccessRowResponse>>
where
    P: PortalProvider,
{
    let actor = session.require()?;
    let row = AccessAdminUseCase::new(state.provider.clone())
        .change_global_role(actor, user_id, req.global_role)
        .await?;

    Ok(Json(UserAccessRowResponse::from(&row)))
}
