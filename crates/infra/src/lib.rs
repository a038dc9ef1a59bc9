//! Infrastructure layer: persistence adapters for the drinks menu.

pub mod store;

pub use store::{DrinkStore, InMemoryDrinkStore, SqliteDrinkStore, StoreError};
