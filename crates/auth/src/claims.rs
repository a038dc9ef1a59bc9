use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Permission, Subject};

/// Verified claims payload.
///
/// Only ever produced by [`crate::JwtVerifier::verify`] after the signature has
/// been checked, and treated as immutable for the rest of the request. The
/// standard claims this service relies on are typed; everything else the
/// issuer put in the token is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject / principal identifier.
    pub sub: Subject,

    /// Expiry (seconds since epoch).
    pub exp: i64,

    /// Granted permissions.
    ///
    /// `None` means the claim was absent, which is a malformed token shape and
    /// distinct from an empty grant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeSet<Permission>>,

    /// Remaining claims (`iss`, `aud`, `iat`, `azp`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn subject(&self) -> &Subject {
        &self.sub
    }

    pub fn permissions(&self) -> Option<&BTreeSet<Permission>> {
        self.permissions.as_ref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Look up a claim outside the typed set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
