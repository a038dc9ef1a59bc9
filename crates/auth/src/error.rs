//! Authorization error types.

use thiserror::Error;

/// Every way a request can fail authorization.
///
/// Each variant carries its own status code (see [`AuthError::status_code`]):
/// 401 for credential and verification failures, 403 for permission denial.
/// The display text is a human-readable description meant for logs; it is
/// never sent to clients verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authorization header absent, not `Bearer`, missing the token, or with extra parts.
    #[error("authorization header missing or malformed: {0}")]
    MissingOrMalformedHeader(String),

    /// No bearer credential was presented.
    #[error("no bearer credential presented")]
    MissingCredential,

    /// Not a structurally valid token (segment count, header, payload shape).
    #[error("malformed token: {0}")]
    MalformedCredential(String),

    /// The token's `alg` is not the single algorithm this verifier trusts.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The token's `kid` is not in the issuer's published key set.
    #[error("signing key not found: {kid}")]
    KeyNotFound { kid: String },

    /// The issuer's key set could not be fetched or used.
    #[error("key set unavailable: {0}")]
    KeySetUnavailable(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    /// Issuer or audience differs from the configured values.
    #[error("claims mismatch: {0}")]
    ClaimsMismatch(String),

    /// The verified token has no `permissions` claim at all.
    #[error("permissions not included in token")]
    NoPermissionsClaim,

    #[error("permission denied: missing '{0}'")]
    PermissionDenied(String),
}

impl AuthError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedCredential(msg.into())
    }

    pub fn header(msg: impl Into<String>) -> Self {
        Self::MissingOrMalformedHeader(msg.into())
    }

    /// HTTP status this failure maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PermissionDenied(_) => 403,
            _ => 401,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidIssuer => AuthError::ClaimsMismatch("issuer".into()),
            ErrorKind::InvalidAudience => AuthError::ClaimsMismatch("audience".into()),
            ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm("algorithm mismatch".into()),
            ErrorKind::MissingRequiredClaim(claim) => {
                AuthError::malformed(format!("missing required claim '{claim}'"))
            }
            _ => AuthError::malformed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denial_is_forbidden_everything_else_unauthorized() {
        assert_eq!(AuthError::PermissionDenied("post:drinks".into()).status_code(), 403);

        for err in [
            AuthError::header("missing"),
            AuthError::MissingCredential,
            AuthError::malformed("2 segments"),
            AuthError::UnsupportedAlgorithm("HS256".into()),
            AuthError::KeyNotFound { kid: "k".into() },
            AuthError::KeySetUnavailable("timeout".into()),
            AuthError::InvalidSignature,
            AuthError::Expired,
            AuthError::ClaimsMismatch("audience".into()),
            AuthError::NoPermissionsClaim,
        ] {
            assert_eq!(err.status_code(), 401, "{err}");
        }
    }

    #[test]
    fn maps_jsonwebtoken_errors() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let err: AuthError = Error::from(ErrorKind::ExpiredSignature).into();
        assert_eq!(err, AuthError::Expired);

        let err: AuthError = Error::from(ErrorKind::InvalidSignature).into();
        assert_eq!(err, AuthError::InvalidSignature);

        let err: AuthError = Error::from(ErrorKind::InvalidAudience).into();
        assert!(matches!(err, AuthError::ClaimsMismatch(_)));

        let err: AuthError = Error::from(ErrorKind::InvalidToken).into();
        assert!(matches!(err, AuthError::MalformedCredential(_)));
    }

    #[test]
    fn display_is_descriptive() {
        let err = AuthError::KeyNotFound { kid: "key-123".into() };
        assert_eq!(err.to_string(), "signing key not found: key-123");
        assert_eq!(
            AuthError::PermissionDenied("delete:drinks".into()).to_string(),
            "permission denied: missing 'delete:drinks'"
        );
    }
}
