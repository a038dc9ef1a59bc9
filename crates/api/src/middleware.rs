//! Per-route permission guard.
//!
//! Wrapping a route runs the whole authorization pipeline before the handler:
//! bearer extraction, token verification, permission check. On success the
//! verified [`Claims`] are inserted as a request extension for the handler;
//! on failure the handler never runs.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
    routing::MethodRouter,
};
use chrono::Utc;

use coffeeshop_auth::{AuthError, Claims, JwtVerifier, Permission, bearer_token, enforce};
use coffeeshop_core::DrinkId;

use crate::app::errors::ApiError;

#[derive(Clone)]
pub struct GuardState {
    pub verifier: Arc<JwtVerifier>,
    pub required: Permission,
}

/// Wrap `route` so each of its methods requires `required`.
pub fn guarded<S>(
    verifier: Arc<JwtVerifier>,
    required: Permission,
    route: MethodRouter<S>,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(axum::middleware::from_fn_with_state(
        GuardState { verifier, required },
        require_permission,
    ))
}

pub async fn require_permission(
    State(guard): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authorize(&guard, req.headers()).await.inspect_err(|e| {
        tracing::warn!(
            path = %req.uri().path(),
            required = %guard.required,
            error = %e,
            "authorization failed"
        );
    })?;

    tracing::debug!(sub = %claims.sub, required = %guard.required, "authorized");
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Answers 404 for an `:id` that is not an integer, before any guard runs:
/// such a path names no drink whoever asks.
pub async fn require_drink_id(
    Path(id): Path<String>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    id.parse::<DrinkId>().map_err(ApiError::from)?;
    Ok(next.run(req).await)
}

async fn authorize(guard: &GuardState, headers: &HeaderMap) -> Result<Claims, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AuthError::header("authorization header is not valid text"))
        })
        .transpose()?;

    let token = bearer_token(header)?;
    let claims = guard.verifier.verify(token, Utc::now()).await?;
    enforce(&claims, &guard.required)?;
    Ok(claims)
}
