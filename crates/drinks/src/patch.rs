//! Partial updates.
//!
//! A field that is absent or "falsy" (null, false, 0, "", [] or {}) means
//! "leave unchanged", so a field cannot be cleared.

use serde_json::Value;

use coffeeshop_core::{DomainError, DomainResult};

use crate::Recipe;

/// Fields supplied by a PATCH request. `None` means "no change".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

impl DrinkPatch {
    /// Parse a PATCH payload `{title?, recipe?}`.
    pub fn from_json(body: Value) -> DomainResult<Self> {
        let Value::Object(mut fields) = body else {
            return Err(DomainError::validation("request body must be a JSON object"));
        };

        let title = match fields.remove("title").filter(is_truthy) {
            None => None,
            Some(Value::String(title)) => Some(title),
            Some(other) => {
                return Err(DomainError::validation(format!("title must be a string, got {other}")));
            }
        };

        let recipe = fields
            .remove("recipe")
            .filter(is_truthy)
            .map(Recipe::from_json)
            .transpose()?;

        Ok(Self { title, recipe })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
