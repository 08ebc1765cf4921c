//! Role gates for the protected route trees.
//!
//! Each gate resolves the caller's identity through the auth provider and
//! either attaches it to the request and continues the chain, or ends the
//! request with a structured rejection. Per request the outcome is one of:
//! 401 (no usable session token), 404 (provider does not know the user),
//! 403 (role claim does not match), 500 (provider lookup failed), or the
//! wrapped handler running with the identity in scope.

use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use crate::middleware::auth::{Identity, bearer_token};
use crate::modules::users::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_session_token;

/// Authenticate the caller and fetch their current provider record.
///
/// The role claim is read from the freshly fetched record, not from the
/// token, so a role change takes effect on the next request.
async fn resolve_identity(state: &AppState, parts: &Parts) -> Result<Identity, AppError> {
    let token =
        bearer_token(parts).ok_or_else(|| AppError::unauthorized("Authentication required"))?;
    let claims = verify_session_token(token, &state.config.auth)?;

    let user = match state.auth.fetch_user(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(AppError::not_found(
                "User not found in authentication system",
            ));
        }
        // Provider trouble must not take the process down with it
        Err(error) => {
            error!(error = ?error, user_id = %claims.sub, "auth provider lookup failed");
            return Err(AppError::internal("Authentication service error"));
        }
    };

    Identity::from_provider(user).map_err(|unknown| {
        warn!(user_id = %claims.sub, claim = %unknown.0, "unrecognized role claim");
        AppError::forbidden("Unrecognized account role")
    })
}

async fn require_role(
    state: AppState,
    req: Request,
    next: Next,
    required: Option<Role>,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();

    let identity = resolve_identity(&state, &parts).await?;

    if let Some(required) = required {
        if identity.role != required {
            return Err(AppError::forbidden(match required {
                Role::Educator => "Educator access required. Please request educator role first",
                Role::Admin => "Admin access required",
                Role::User => "User access required",
            }));
        }
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Gate requiring any authenticated identity.
pub async fn require_authenticated(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(state, req, next, None).await
}

/// Gate requiring the educator role exactly.
pub async fn require_educator(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(state, req, next, Some(Role::Educator)).await
}

/// Gate requiring the admin role exactly.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(state, req, next, Some(Role::Admin)).await
}
