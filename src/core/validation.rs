//! Parameter validation utilities.
//!
//! Small helpers used to validate configuration values once at startup, so
//! that invalid settings fail fast instead of surfacing per-request.

use crate::core::ExtractError;

/// Validates that a float value is finite (not NaN or infinite).
#[inline]
pub fn validate_finite(value: f32, param_name: &str) -> Result<(), ExtractError> {
    if !value.is_finite() {
        return Err(ExtractError::config(format!(
            "Parameter '{param_name}' must be finite, got: {value}"
        )));
    }
    Ok(())
}

/// Validates that a value is positive (> 0).
#[inline]
pub fn validate_positive<T: PartialOrd + std::fmt::Display + Default>(
    value: T,
    param_name: &str,
) -> Result<(), ExtractError> {
    if value <= T::default() {
        return Err(ExtractError::config(format!(
            "Parameter '{param_name}' must be positive, got: {value}"
        )));
    }
    Ok(())
}

/// Validates that a collection is not empty.
#[inline]
pub fn validate_non_empty<T>(items: &[T], param_name: &str) -> Result<(), ExtractError> {
    if items.is_empty() {
        return Err(ExtractError::config(format!(
            "Parameter '{param_name}' cannot be empty"
        )));
    }
    Ok(())
}
