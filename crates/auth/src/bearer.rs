//! Bearer credential extraction from an `Authorization` header value.

use crate::AuthError;

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. Fails when the header is absent,
/// uses another scheme, has no token, or has more than one token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or_else(|| AuthError::header("authorization header is expected"))?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::header("authorization header must start with \"Bearer\""))
        }
        (Some(_), Some(token), None) => Ok(token),
        (Some(_), None, _) => Err(AuthError::header("token not found")),
        _ => Err(AuthError::header("authorization header must be a bearer token")),
    }
}
