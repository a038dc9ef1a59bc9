//! Shared test utilities: a fixed RS256 key pair, its JWK set, and a builder
//! for signed tokens.
//!
//! Feature-gated behind `testutil`. Enable it from dev-dependencies only:
//!
//! ```toml
//! [dev-dependencies]
//! coffeeshop-auth = { path = "../auth", features = ["testutil"] }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, jwk::JwkSet};
use serde_json::{Map, Value, json};

use crate::{JwtVerifier, StaticKeySet, VerifierConfig};

pub const TEST_KID: &str = "coffeeshop-test-key";
pub const TEST_ISSUER: &str = "https://coffeeshop.test/";
pub const TEST_AUDIENCE: &str = "drinks";

const SIGNING_KEY_PEM: &str = include_str!("../fixtures/signing_key.pem");
const ROGUE_SIGNING_KEY_PEM: &str = include_str!("../fixtures/rogue_signing_key.pem");

/// Base64url modulus of `fixtures/signing_key.pem` (public exponent 65537).
const SIGNING_KEY_MODULUS: &str = "pQsO76cyZ7sNPsmL3Ll3-hkROYjANbJ5cCjgVTuXp_Qw7Jgs065ram2f3Nc_ef0YeFUfO504muw0mjV3qS19brvN-svjFb_4qBLGirTrDVs-yG784dzv_kM6orRff1fOvEm3iTQlvret3zVb01YliYsuwX0EyhvWfZoYcysCs1Bw7OuaZOnc4irDsma-M-5sYT8cqGvXqxqGyF9cxbTqTQKcKDUEDvGEp8LZellwONNH6y_zjtxh1ZTGrwwgPTo0-Wkjlpkth6eCrddmn-ObCTdNOECcSVfRHPQGq5NaDwXfYfksb5R31dN3abyKkd6HQ9SNyxJfpxjrSpXrUKI9gw";

/// JWK set publishing the test signing key under [`TEST_KID`].
pub fn test_key_set() -> JwkSet {
    serde_json::from_value(json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": TEST_KID,
            "n": SIGNING_KEY_MODULUS,
            "e": "AQAB",
        }]
    }))
    .expect("test JWK set is valid")
}

pub fn test_verifier_config() -> VerifierConfig {
    VerifierConfig::new(TEST_ISSUER, TEST_AUDIENCE)
}

/// Verifier trusting [`test_key_set`] with the test issuer and audience.
pub fn test_verifier() -> JwtVerifier {
    JwtVerifier::new(
        test_verifier_config(),
        Arc::new(StaticKeySet::new(test_key_set())),
    )
}

/// Builder for RS256 tokens. Defaults to a valid token for the test issuer
/// and audience, expiring in one hour, with an empty permission set.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    claims: Map<String, Value>,
    kid: Option<String>,
    rogue: bool,
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBuilder {
    pub fn new() -> Self {
        let now = Utc::now();
        let mut claims = Map::new();
        claims.insert("iss".into(), json!(TEST_ISSUER));
        claims.insert("sub".into(), json!("auth0|tester"));
        claims.insert("aud".into(), json!(TEST_AUDIENCE));
        claims.insert("iat".into(), json!(now.timestamp()));
        claims.insert("exp".into(), json!((now + Duration::hours(1)).timestamp()));
        claims.insert("permissions".into(), json!([]));

        Self {
            claims,
            kid: Some(TEST_KID.to_string()),
            rogue: false,
        }
    }

    pub fn subject(self, sub: &str) -> Self {
        self.claim("sub", json!(sub))
    }

    pub fn permissions(self, permissions: &[&str]) -> Self {
        self.claim("permissions", json!(permissions))
    }

    pub fn without_permissions(mut self) -> Self {
        self.claims.remove("permissions");
        self
    }

    pub fn expires_at(self, at: DateTime<Utc>) -> Self {
        self.claim("exp", json!(at.timestamp()))
    }

    pub fn issuer(self, iss: &str) -> Self {
        self.claim("iss", json!(iss))
    }

    pub fn audience(self, aud: &str) -> Self {
        self.claim("aud", json!(aud))
    }

    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.claims.insert(name.to_string(), value);
        self
    }

    pub fn kid(mut self, kid: &str) -> Self {
        self.kid = Some(kid.to_string());
        self
    }

    pub fn without_kid(mut self) -> Self {
        self.kid = None;
        self
    }

    /// Sign with a key that is not in the published set (but keep the `kid`).
    pub fn signed_by_rogue_key(mut self) -> Self {
        self.rogue = true;
        self
    }

    pub fn sign(self) -> String {
        let pem = if self.rogue {
            ROGUE_SIGNING_KEY_PEM
        } else {
            SIGNING_KEY_PEM
        };
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("test signing key is valid PEM");

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.kid;

        jsonwebtoken::encode(&header, &Value::Object(self.claims), &key)
            .expect("failed to encode test token")
    }
}

/// Valid RS256 token for the test issuer granting `permissions`.
pub fn mint_token(permissions: &[&str]) -> String {
    TokenBuilder::new().permissions(permissions).sign()
}

/// Token with otherwise valid claims but signed with HS256.
pub fn hs256_token(permissions: &[&str]) -> String {
    let now = Utc::now();
    let claims = json!({
        "iss": TEST_ISSUER,
        "sub": "auth0|tester",
        "aud": TEST_AUDIENCE,
        "exp": (now + Duration::hours(1)).timestamp(),
        "permissions": permissions,
    });

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(TEST_KID.to_string());

    jsonwebtoken::encode(&header, &claims, &EncodingKey::from_secret(b"shared-secret"))
        .expect("failed to encode test token")
}
