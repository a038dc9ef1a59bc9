//! Failures raised while interpreting drink data.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// A drink payload or identifier that cannot be accepted.
///
/// Persistence and transport failures have their own types in the crates
/// that own those concerns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Payload shape is wrong (missing title, recipe not an object or list, ...).
    #[error("invalid drink payload: {0}")]
    Validation(String),

    /// Text that does not name a drink id.
    #[error("not a drink id: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(raw: impl Into<String>) -> Self {
        Self::InvalidId(raw.into())
    }
}

/// Serde rejections of ingredient records are payload errors.
impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}
