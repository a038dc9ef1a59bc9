//! Drinks domain module.
//!
//! Recipe normalization, partial updates and the public/detailed projections
//! of a drink. Pure logic; storage and HTTP live in other crates.

pub mod drink;
pub mod patch;
pub mod recipe;
pub mod views;

pub use drink::{Drink, NewDrink};
pub use patch::DrinkPatch;
pub use recipe::{Ingredient, Recipe};
pub use views::{LongView, ShortIngredient, ShortView};
