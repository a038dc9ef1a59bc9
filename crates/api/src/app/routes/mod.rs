use std::sync::Arc;

use axum::{
    routing::{MethodRouter, delete, get, patch, post},
    Router,
};

use coffeeshop_auth::{JwtVerifier, Permission};

use crate::middleware::{guarded, require_drink_id};

pub mod drinks;

pub const GET_DRINKS_DETAIL: Permission = Permission::from_static("get:drinks-detail");
pub const POST_DRINKS: Permission = Permission::from_static("post:drinks");
pub const PATCH_DRINKS: Permission = Permission::from_static("patch:drinks");
pub const DELETE_DRINKS: Permission = Permission::from_static("delete:drinks");

/// Every drinks endpoint; all but the public listing sit behind a permission guard.
pub fn router(verifier: Arc<JwtVerifier>) -> Router {
    let guard = |required: Permission, route: MethodRouter| guarded(verifier.clone(), required, route);

    Router::new()
        .route("/drinks", get(drinks::list_drinks))
        .route("/drinks", guard(POST_DRINKS, post(drinks::create_drink)))
        .route(
            "/drinks-detail",
            guard(GET_DRINKS_DETAIL, get(drinks::drink_details)),
        )
        .route(
            "/drinks/:id",
            guard(PATCH_DRINKS, patch(drinks::update_drink))
                .merge(guard(DELETE_DRINKS, delete(drinks::delete_drink)))
                .route_layer(axum::middleware::from_fn(require_drink_id)),
        )
}
