//! Token verification against the issuer's published key set.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde_json::{Map, Value};

use crate::{AuthError, CachedKeySet, Claims, KeySetSource};

/// The one signing algorithm this service accepts.
pub const TRUSTED_ALGORITHM: Algorithm = Algorithm::RS256;
const TRUSTED_ALGORITHM_NAME: &str = "RS256";

/// Expected issuer and audience of every accepted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub issuer: String,
    pub audience: String,
}

impl VerifierConfig {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Auth0 tenants issue tokens as `https://{domain}/`.
    pub fn for_auth0_domain(domain: &str, audience: impl Into<String>) -> Self {
        Self::new(format!("https://{}/", domain.trim_end_matches('/')), audience)
    }
}

/// Decodes and cryptographically validates bearer tokens.
///
/// Order of checks: structure, algorithm, key id, signature (with issuer and
/// audience), expiry. No claim content is used before the signature is checked.
#[derive(Debug)]
pub struct JwtVerifier {
    config: VerifierConfig,
    keys: CachedKeySet,
}

impl JwtVerifier {
    pub fn new(config: VerifierConfig, source: Arc<dyn KeySetSource>) -> Self {
        Self {
            config,
            keys: CachedKeySet::new(source),
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify `token` as of `now` and return its claims.
    #[tracing::instrument(skip(self, token), fields(kid = tracing::field::Empty))]
    pub async fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingCredential);
        }
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(AuthError::malformed("token must have 3 segments"));
        }

        let alg = declared_algorithm(segments[0])?;
        if alg != TRUSTED_ALGORITHM_NAME {
            return Err(AuthError::UnsupportedAlgorithm(alg));
        }

        let header = decode_header(token)
            .map_err(|e| AuthError::malformed(format!("unparseable header: {e}")))?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::malformed("header missing 'kid'"))?;
        tracing::Span::current().record("kid", kid.as_str());

        let keys = self.keys.get().await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::KeyNotFound { kid: kid.clone() })?;
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| AuthError::KeySetUnavailable(format!("unusable key '{kid}': {e}")))?;

        let claims = decode::<Claims>(token, &key, &self.validation())?.claims;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }

        tracing::debug!(sub = %claims.sub, %kid, "token verified");
        Ok(claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(TRUSTED_ALGORITHM);
        // Expiry is checked against the caller-supplied clock after decoding.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_audience(&[self.config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

/// Read `alg` from the raw header segment.
///
/// Done before [`decode_header`], which cannot represent algorithms it has no
/// variant for (`none`, `ES512`, ...) and would report them as malformed.
fn declared_algorithm(header_segment: &str) -> Result<String, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(header_segment.trim_end_matches('='))
        .map_err(|e| AuthError::malformed(format!("header is not base64url: {e}")))?;
    let header: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::malformed(format!("unparseable header: {e}")))?;

    match header.get("alg") {
        Some(Value::String(alg)) => Ok(alg.clone()),
        Some(other) => Err(AuthError::malformed(format!("header 'alg' is not a string: {other}"))),
        None => Err(AuthError::malformed("header missing 'alg'")),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;
    use crate::testutil::{self, TokenBuilder};

    #[tokio::test]
    async fn accepts_valid_token() {
        let verifier = testutil::test_verifier();
        let token = TokenBuilder::new()
            .subject("auth0|barista")
            .permissions(&["get:drinks-detail"])
            .sign();

        let claims = verifier.verify(&token, Utc::now()).await.unwrap();
        assert_eq!(claims.subject().as_str(), "auth0|barista");
        assert_eq!(claims.permissions().unwrap().len(), 1);
        assert_eq!(claims.get("iss"), Some(&json!(testutil::TEST_ISSUER)));
    }

    #[tokio::test]
    async fn empty_token_is_missing_credential() {
        let verifier = testutil::test_verifier();
        assert_eq!(verifier.verify("", Utc::now()).await, Err(AuthError::MissingCredential));
    }

    #[tokio::test]
    async fn rejects_wrong_segment_count() {
        let verifier = testutil::test_verifier();
        for token in ["abc", "a.b", "a.b.c.d"] {
            assert!(matches!(
                verifier.verify(token, Utc::now()).await,
                Err(AuthError::MalformedCredential(_))
            ));
        }
    }

    #[tokio::test]
    async fn rejects_unparseable_header() {
        let verifier = testutil::test_verifier();
        assert!(matches!(
            verifier.verify("bm90LWpzb24.e30.c2ln", Utc::now()).await,
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[tokio::test]
    async fn rejects_untrusted_algorithm() {
        let verifier = testutil::test_verifier();
        let token = testutil::hs256_token(&["get:drinks-detail"]);
        assert!(matches!(
            verifier.verify(&token, Utc::now()).await,
            Err(AuthError::UnsupportedAlgorithm(_))
        ));
    }

    fn unsigned_token(header: Value) -> String {
        let encode = |v: &Value| URL_SAFE_NO_PAD.encode(serde_json::to_vec(v).unwrap());
        format!("{}.{}.c2ln", encode(&header), encode(&json!({"sub": "auth0|x"})))
    }

    #[tokio::test]
    async fn rejects_alg_none() {
        let verifier = testutil::test_verifier();
        let token = unsigned_token(json!({"alg": "none", "kid": testutil::TEST_KID}));

        assert_eq!(
            verifier.verify(&token, Utc::now()).await,
            Err(AuthError::UnsupportedAlgorithm("none".into()))
        );
    }

    #[tokio::test]
    async fn rejects_algorithms_outside_the_trusted_one() {
        let verifier = testutil::test_verifier();
        for alg in ["ES512", "RS512", "PS256", "made-up"] {
            let token = unsigned_token(json!({"alg": alg, "kid": testutil::TEST_KID}));
            assert_eq!(
                verifier.verify(&token, Utc::now()).await,
                Err(AuthError::UnsupportedAlgorithm(alg.into())),
                "alg {alg}"
            );
        }
    }

    #[tokio::test]
    async fn header_without_alg_is_malformed() {
        let verifier = testutil::test_verifier();
        let token = unsigned_token(json!({"kid": testutil::TEST_KID}));
        assert!(matches!(
            verifier.verify(&token, Utc::now()).await,
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[tokio::test]
    async fn rejects_missing_kid() {
        let verifier = testutil::test_verifier();
        let token = TokenBuilder::new().without_kid().sign();
        assert!(matches!(
            verifier.verify(&token, Utc::now()).await,
            Err(AuthError::MalformedCredential(_))
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_kid() {
        let verifier = testutil::test_verifier();
        let token = TokenBuilder::new().kid("rotated-away").sign();
        assert_eq!(
            verifier.verify(&token, Utc::now()).await,
            Err(AuthError::KeyNotFound { kid: "rotated-away".into() })
        );
    }

    #[tokio::test]
    async fn rejects_signature_from_another_key() {
        let verifier = testutil::test_verifier();
        let token = TokenBuilder::new().signed_by_rogue_key().sign();
        assert_eq!(verifier.verify(&token, Utc::now()).await, Err(AuthError::InvalidSignature));
    }

    #[tokio::test]
    async fn rejects_tampered_payload() {
        let verifier = testutil::test_verifier();
        let token = TokenBuilder::new().permissions(&["get:drinks-detail"]).sign();
        let forged = TokenBuilder::new()
            .permissions(&["get:drinks-detail", "delete:drinks"])
            .sign();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        assert_eq!(verifier.verify(&tampered, Utc::now()).await, Err(AuthError::InvalidSignature));
    }

    #[tokio::test]
    async fn rejects_token_expired_one_second_ago() {
        let verifier = testutil::test_verifier();
        let now = Utc::now();
        let token = TokenBuilder::new()
            .expires_at(now - Duration::seconds(1))
            .sign();

        let err = verifier.verify(&token, now).await.unwrap_err();
        assert_eq!(err, AuthError::Expired);
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn expiry_is_relative_to_verification_time() {
        let verifier = testutil::test_verifier();
        let now = Utc::now();
        let token = TokenBuilder::new()
            .expires_at(now + Duration::minutes(5))
            .sign();

        assert!(verifier.verify(&token, now).await.is_ok());
        assert_eq!(
            verifier.verify(&token, now + Duration::minutes(10)).await,
            Err(AuthError::Expired)
        );
    }

    #[tokio::test]
    async fn rejects_foreign_issuer_and_audience() {
        let verifier = testutil::test_verifier();

        let token = TokenBuilder::new().issuer("https://evil.example/").sign();
        assert!(matches!(
            verifier.verify(&token, Utc::now()).await,
            Err(AuthError::ClaimsMismatch(_))
        ));

        let token = TokenBuilder::new().audience("payments").sign();
        assert!(matches!(
            verifier.verify(&token, Utc::now()).await,
            Err(AuthError::ClaimsMismatch(_))
        ));
    }

    #[tokio::test]
    async fn accepts_audience_list() {
        let verifier = testutil::test_verifier();
        let token = TokenBuilder::new()
            .claim("aud", json!([testutil::TEST_AUDIENCE, "https://coffeeshop.test/userinfo"]))
            .sign();

        assert!(verifier.verify(&token, Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn keeps_absent_permissions_absent() {
        let verifier = testutil::test_verifier();
        let token = TokenBuilder::new().without_permissions().sign();

        let claims = verifier.verify(&token, Utc::now()).await.unwrap();
        assert!(claims.permissions().is_none());
    }

    #[test]
    fn auth0_issuer_format() {
        let config = VerifierConfig::for_auth0_domain("coffeeshop.us.auth0.com", "drinks");
        assert_eq!(config.issuer, "https://coffeeshop.us.auth0.com/");
        assert_eq!(config.audience, "drinks");
    }
}
