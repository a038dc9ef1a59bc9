//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a drink, assigned by the store on insert.
///
/// Immutable once assigned; the store is the only party that mints new values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrinkId(i64);

impl DrinkId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for DrinkId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for DrinkId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<DrinkId> for i64 {
    fn from(value: DrinkId) -> Self {
        value.0
    }
}

impl FromStr for DrinkId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("DrinkId: {e}")))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_ids() {
        let id: DrinkId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_integer_ids() {
        let err = "abc".parse::<DrinkId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }
}
