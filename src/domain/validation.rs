//! Boundary checks for values entering a snapshot.
//!
//! Everything the engine consumes passes through here first, either from the
//! storage document or from data-entry commands.

use crate::domain::error::FolioError;

/// Trims and upper-cases a symbol. Empty symbols are rejected.
pub fn normalize_symbol(raw: &str) -> Result<String, FolioError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(FolioError::invalid_input("symbol", "must not be empty"));
    }
    Ok(symbol)
}

pub fn validate_price(value: f64) -> Result<f64, FolioError> {
    validate_non_negative("price", value)
}

pub fn validate_quantity(value: f64) -> Result<f64, FolioError> {
    if !value.is_finite() {
        return Err(FolioError::invalid_input("quantity", "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(FolioError::invalid_input("quantity", "must be positive"));
    }
    Ok(value)
}

/// Goal monthly contribution.
pub fn validate_amount(field: &str, value: f64) -> Result<f64, FolioError> {
    validate_non_negative(field, value)
}

/// Goal target. Negative targets are kept and count as already reached.
pub fn validate_target(value: f64) -> Result<f64, FolioError> {
    if !value.is_finite() {
        return Err(FolioError::invalid_input("target", "must be a finite number"));
    }
    Ok(value)
}

fn validate_non_negative(field: &str, value: f64) -> Result<f64, FolioError> {
    if !value.is_finite() {
        return Err(FolioError::invalid_input(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(FolioError::invalid_input(field, "must be non-negative"));
    }
    Ok(value)
}
