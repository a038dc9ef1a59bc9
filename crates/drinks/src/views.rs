//! Read projections of a drink.
//!
//! The short view is public and withholds ingredient names; the long view is
//! the full record and is only served to callers with the detail permission.

use serde::Serialize;

use coffeeshop_core::DrinkId;

use crate::{Drink, Ingredient};

/// Ingredient as shown publicly: color and quantity, no name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortView {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongView {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<&Drink> for ShortView {
    fn from(drink: &Drink) -> Self {
        Self {
            id: drink.id(),
            title: drink.title().to_string(),
            recipe: drink
                .recipe()
                .ingredients()
                .iter()
                .map(|i| ShortIngredient {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

impl From<&Drink> for LongView {
    fn from(drink: &Drink) -> Self {
        Self {
            id: drink.id(),
            title: drink.title().to_string(),
            recipe: drink.recipe().ingredients().to_vec(),
        }
    }
}
