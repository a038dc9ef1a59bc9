use serde_json::Value;

use coffeeshop_core::{DomainError, DomainResult, DrinkId};

use crate::{DrinkPatch, LongView, Recipe, ShortView};

/// A drink on the menu.
///
/// The id is assigned by the store and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    id: DrinkId,
    title: String,
    recipe: Recipe,
}

impl Drink {
    pub fn new(id: DrinkId, title: impl Into<String>, recipe: Recipe) -> Self {
        Self {
            id,
            title: title.into(),
            recipe,
        }
    }

    pub fn id(&self) -> DrinkId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Apply the supplied fields of `patch`, leaving the others untouched.
    ///
    /// Returns whether anything was supplied.
    pub fn apply(&mut self, patch: DrinkPatch) -> bool {
        let mut changed = false;
        if let Some(title) = patch.title {
            self.title = title;
            changed = true;
        }
        if let Some(recipe) = patch.recipe {
            self.recipe = recipe;
            changed = true;
        }
        changed
    }

    /// Public projection: ingredient names are withheld.
    pub fn short(&self) -> ShortView {
        ShortView::from(self)
    }

    /// Full projection.
    pub fn long(&self) -> LongView {
        LongView::from(self)
    }
}

/// A drink that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

impl NewDrink {
    /// Parse a create payload `{title, recipe}`.
    ///
    /// `recipe` may be a single ingredient object or an array of them. The title
    /// must be present but is not otherwise checked.
    pub fn from_json(body: Value) -> DomainResult<Self> {
        let Value::Object(mut fields) = body else {
            return Err(DomainError::validation("request body must be a JSON object"));
        };

        let title = match fields.remove("title") {
            Some(Value::String(title)) => title,
            Some(Value::Null) | None => return Err(DomainError::validation("title is required")),
            Some(other) => {
                return Err(DomainError::validation(format!("title must be a string, got {other}")));
            }
        };
        let recipe = Recipe::from_json(fields.remove("recipe").unwrap_or(Value::Null))?;

        Ok(Self { title, recipe })
    }
}
