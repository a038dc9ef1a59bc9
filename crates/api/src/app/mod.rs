//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and verifier construction
//! - `routes/`: the drinks endpoints and their permission guards
//! - `dto.rs`: request decoding and response bodies
//! - `errors.rs`: the one error-to-response translator

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use coffeeshop_auth::JwtVerifier;

use crate::context::AppContext;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the tests).
pub fn build_app(ctx: AppContext, verifier: Arc<JwtVerifier>) -> Router {
    routes::router(verifier)
        .fallback(errors::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::map_response(
                    errors::envelope_method_not_allowed,
                ))
                .layer(Extension(ctx)),
        )
}
