//! Result type alias for Caravan
//!
//! This module provides a convenient Result type alias that uses
//! [`CaravanError`] as the error type.

use super::errors::CaravanError;

/// Result type alias for Caravan operations
///
/// # Examples
///
/// ```
/// use caravan::domain::{CaravanError, Result};
///
/// fn validate_batch_size(size: usize) -> Result<()> {
///     if size == 0 {
///         return Err(CaravanError::validation("batch_size", "must be greater than zero"));
///     }
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CaravanError>;
