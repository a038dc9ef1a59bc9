use serde::Serialize;
use serde_json::Value;

use coffeeshop_core::DrinkId;

use crate::app::errors::ApiError;

// -------------------------
// Request bodies
// -------------------------

/// Decode a request body as JSON regardless of its declared content type.
///
/// Bodies are kept as raw values: which fields count as present is decided by
/// the drink payload parsers, not by serde defaults.
pub fn json_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))
}

// -------------------------
// Response bodies
// -------------------------

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: DrinkId,
}

impl DeleteResponse {
    pub fn new(id: DrinkId) -> Self {
        Self { success: true, delete: id }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

impl ErrorEnvelope {
    pub fn new(error: u16, message: &'static str) -> Self {
        Self {
            success: false,
            error,
            message,
        }
    }
}
