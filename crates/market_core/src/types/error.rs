//! Error types for the date and currency value types.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `CurrencyError`: Errors from currency and currency pair parsing

use thiserror::Error;

/// Date-related errors.
///
/// # Examples
/// ```
/// use market_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Unrecognised day count convention name.
    #[error("Unknown day count convention: {0}")]
    UnknownDayCount(String),
}

/// Currency-related errors.
///
/// # Examples
/// ```
/// use market_core::types::CurrencyError;
///
/// let err = CurrencyError::UnknownCurrency("XYZ".to_string());
/// assert_eq!(format!("{}", err), "Unknown currency: XYZ");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurrencyError {
    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Failed to parse a currency pair string.
    #[error("Currency pair parse error: {0}")]
    ParseError(String),

    /// Base and quote currencies are the same.
    #[error("Base and quote currencies are the same: {0}")]
    SameCurrency(String),

    /// FX rate is not positive.
    #[error("Invalid FX rate: {0} must be positive")]
    InvalidRate(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_error_display() {
        assert_eq!(
            DateError::ParseError("bad".to_string()).to_string(),
            "Date parse error: bad"
        );
        assert_eq!(
            DateError::UnknownDayCount("ACT/ACT".to_string()).to_string(),
            "Unknown day count convention: ACT/ACT"
        );
    }

    #[test]
    fn test_currency_error_display() {
        assert_eq!(
            CurrencyError::SameCurrency("USD".to_string()).to_string(),
            "Base and quote currencies are the same: USD"
        );
        assert_eq!(
            CurrencyError::InvalidRate(-1.0).to_string(),
            "Invalid FX rate: -1 must be positive"
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = DateError::ParseError("x".to_string());
        let _: &dyn std::error::Error = &err;
        let err = CurrencyError::ParseError("x".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
