//! `coffeeshop-auth`: authorization pipeline for the drinks API.
//!
//! Bearer extraction, token verification against the issuer's published key
//! set, and permission enforcement. This crate is intentionally decoupled from
//! HTTP frameworks and storage; status codes are exposed as plain integers.

pub mod authorize;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod keyset;
pub mod permissions;
pub mod principal;
pub mod verifier;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use authorize::enforce;
pub use bearer::bearer_token;
pub use claims::Claims;
pub use error::AuthError;
pub use keyset::{CachedKeySet, KeySetSource, RemoteKeySet, StaticKeySet};
pub use permissions::Permission;
pub use principal::Subject;
pub use verifier::{JwtVerifier, TRUSTED_ALGORITHM, VerifierConfig};
