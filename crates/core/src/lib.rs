//! `coffeeshop-core`: the drink identifier and the domain error model shared
//! by every other crate. No I/O lives here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::DrinkId;
