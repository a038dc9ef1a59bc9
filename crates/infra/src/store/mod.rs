//! Drink persistence boundary.
//!
//! The store exclusively owns drink records. Each operation is a single atomic
//! unit on one row; overlapping writers resolve as last-writer-wins.

use async_trait::async_trait;
use thiserror::Error;

use coffeeshop_core::{DomainError, DrinkId};
use coffeeshop_drinks::{Drink, Ingredient, NewDrink, Recipe};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryDrinkStore;
pub use sqlite::SqliteDrinkStore;

/// Persistence failure, as reported by a store adapter.
///
/// Callers currently answer every variant with 400; the variants stay distinct
/// so client-attributable failures can later be told apart from outages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record cannot be persisted as given.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unique constraint violated (duplicate title).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("drink not found")]
    NotFound,

    /// A stored row no longer decodes into a drink.
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: DrinkId, reason: String },

    /// Backend unreachable or failing.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the failure is attributable to the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Conflict(_) | Self::NotFound)
    }
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Drink table abstraction.
#[async_trait]
pub trait DrinkStore: Send + Sync {
    /// Every drink, ordered by id.
    async fn all(&self) -> Result<Vec<Drink>, StoreError>;

    async fn find_by_id(&self, id: DrinkId) -> Result<Option<Drink>, StoreError>;

    /// Insert a new drink; the store assigns its id.
    async fn insert(&self, drink: NewDrink) -> Result<Drink, StoreError>;

    /// Overwrite title and recipe of an existing drink.
    async fn update(&self, drink: &Drink) -> Result<(), StoreError>;

    async fn delete(&self, id: DrinkId) -> Result<(), StoreError>;

    /// Drop every record and start over from [`seed_drinks`].
    async fn reset(&self) -> Result<(), StoreError>;
}

/// Drinks present right after a reset.
pub fn seed_drinks() -> Vec<NewDrink> {
    vec![NewDrink {
        title: "water".to_string(),
        recipe: Recipe::new(vec![Ingredient::new("blue", "water", 1)]),
    }]
}
