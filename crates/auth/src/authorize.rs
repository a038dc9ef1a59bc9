use crate::{AuthError, Claims, Permission};

/// Permission enforcer: decide whether verified `claims` grant `required`.
///
/// - No IO
/// - No panics
/// - Exact set membership only (no hierarchy, no wildcard, no role expansion)
pub fn enforce(claims: &Claims, required: &Permission) -> Result<(), AuthError> {
    let granted = claims.permissions().ok_or(AuthError::NoPermissionsClaim)?;

    if granted.contains(required) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims_with(permissions: serde_json::Value) -> Claims {
        serde_json::from_value(json!({
            "sub": "auth0|manager",
            "exp": 4_000_000_000i64,
            "permissions": permissions,
        }))
        .unwrap()
    }

    #[test]
    fn grants_exact_match() {
        let claims = claims_with(json!(["get:drinks-detail", "post:drinks"]));
        assert_eq!(enforce(&claims, &Permission::new("post:drinks")), Ok(()));
    }

    #[test]
    fn denies_missing_permission() {
        let claims = claims_with(json!(["get:drinks-detail"]));
        let err = enforce(&claims, &Permission::new("delete:drinks")).unwrap_err();
        assert_eq!(err, AuthError::PermissionDenied("delete:drinks".into()));
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn empty_grant_is_a_denial() {
        let claims = claims_with(json!([]));
        assert!(matches!(
            enforce(&claims, &Permission::new("patch:drinks")),
            Err(AuthError::PermissionDenied(_))
        ));
    }

    #[test]
    fn absent_claim_is_not_a_denial() {
        let claims: Claims =
            serde_json::from_value(json!({"sub": "auth0|x", "exp": 4_000_000_000i64})).unwrap();
        assert_eq!(
            enforce(&claims, &Permission::new("patch:drinks")),
            Err(AuthError::NoPermissionsClaim)
        );
    }

    #[test]
    fn no_wildcard_or_prefix_matching() {
        let claims = claims_with(json!(["*", "patch", "patch:drinks:all"]));
        assert!(enforce(&claims, &Permission::new("patch:drinks")).is_err());
    }
}
