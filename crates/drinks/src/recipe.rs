use serde::{Deserialize, Serialize};
use serde_json::Value;

use coffeeshop_core::{DomainError, DomainResult};

/// One line of a recipe: how many parts of which ingredient, and the color
/// it shows in the cup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: i64,
}

impl Ingredient {
    pub fn new(color: impl Into<String>, name: impl Into<String>, parts: i64) -> Self {
        Self {
            color: color.into(),
            name: name.into(),
            parts,
        }
    }
}

/// Ordered sequence of ingredients.
///
/// Always a sequence once constructed: a single ingredient object supplied by a
/// client is normalized to a one-element recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(Vec<Ingredient>);

impl Recipe {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }

    /// Parse a client-supplied recipe, normalizing a single object to a
    /// one-element sequence.
    pub fn from_json(value: Value) -> DomainResult<Self> {
        match value {
            Value::Object(_) => {
                let ingredient: Ingredient = serde_json::from_value(value)?;
                Ok(Self(vec![ingredient]))
            }
            Value::Array(_) => Ok(Self(serde_json::from_value(value)?)),
            Value::Null => Err(DomainError::validation("recipe is required")),
            other => Err(DomainError::validation(format!(
                "recipe must be an object or an array of objects, got {other}"
            ))),
        }
    }

    /// Decode the serialized form kept by the store.
    pub fn from_stored(raw: &str) -> DomainResult<Self> {
        Ok(Self(serde_json::from_str(raw)?))
    }

    /// Serialized form kept by the store.
    pub fn to_stored(&self) -> DomainResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
