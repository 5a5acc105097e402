//! Market data error types.
//!
//! Every failure in assembling or querying market data is reported through
//! [`MarketDataError`]. All of them are caller or configuration errors: they
//! are returned synchronously and never retried.

use thiserror::Error;

/// Market data assembly and query errors.
///
/// # Variants
///
/// - `NullArgument`: A required identifier, value or collection is missing
/// - `TypeMismatch`: A value's type does not match its identifier's type
/// - `InvalidCardinality`: A multi-scenario box with no values
/// - `EmptyValuationDate`: The valuation date was never set
/// - `ScenarioCountConflict`: A box disagrees with the established scenario count
/// - `KeyNotFound`: A value was requested that was never added
/// - `IndexOutOfRange`: A scenario index beyond a box's scenario count
///
/// # Examples
///
/// ```
/// use market_core::error::MarketDataError;
///
/// let err = MarketDataError::IndexOutOfRange { index: 3, count: 3 };
/// assert_eq!(format!("{}", err), "Scenario index 3 out of range for 3 scenarios");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    /// A required argument is missing.
    #[error("Missing required argument: {argument}")]
    NullArgument {
        /// Name of the missing argument
        argument: String,
    },

    /// A value's type is not compatible with its identifier's declared type.
    #[error("Market data value {value} does not match the type of the key {id}: expected {expected}, found {actual}")]
    TypeMismatch {
        /// The offending identifier
        id: String,
        /// Debug rendering of the offending value
        value: String,
        /// Type declared by the identifier
        expected: &'static str,
        /// Type of the supplied value
        actual: &'static str,
    },

    /// A multi-scenario box must hold at least one value.
    #[error("Invalid scenario cardinality: {count}, a multi-scenario value needs at least one scenario")]
    InvalidCardinality {
        /// The rejected number of values
        count: usize,
    },

    /// The valuation date has not been set.
    #[error("Valuation date must not be empty")]
    EmptyValuationDate,

    /// A box's scenario count disagrees with the established count.
    #[error("Cannot add value {value} with {count} scenarios to market data with {expected} scenarios")]
    ScenarioCountConflict {
        /// Debug rendering of the offending box
        value: String,
        /// Scenario count of the offending box
        count: usize,
        /// Scenario count already established
        expected: usize,
    },

    /// No value exists for the identifier.
    #[error("No market data for key {id}")]
    KeyNotFound {
        /// The missing identifier
        id: String,
    },

    /// Scenario index beyond the box's scenario count.
    #[error("Scenario index {index} out of range for {count} scenarios")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of scenarios in the box
        count: usize,
    },
}

impl MarketDataError {
    /// Shorthand for a `NullArgument` error.
    pub fn null_argument(argument: impl Into<String>) -> Self {
        MarketDataError::NullArgument {
            argument: argument.into(),
        }
    }
}

/// Result alias for market data operations.
pub type MarketDataResult<T> = Result<T, MarketDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = MarketDataError::TypeMismatch {
            id: "FxRate(EUR/USD)".to_string(),
            value: "\"oops\"".to_string(),
            expected: "FxRate",
            actual: "&str",
        };
        assert_eq!(
            err.to_string(),
            "Market data value \"oops\" does not match the type of the key FxRate(EUR/USD): expected FxRate, found &str"
        );
    }

    #[test]
    fn test_scenario_count_conflict_display() {
        let err = MarketDataError::ScenarioCountConflict {
            value: "Multi".to_string(),
            count: 3,
            expected: 5,
        };
        assert_eq!(
            err.to_string(),
            "Cannot add value Multi with 3 scenarios to market data with 5 scenarios"
        );
    }

    #[test]
    fn test_null_argument_helper() {
        assert_eq!(
            MarketDataError::null_argument("id"),
            MarketDataError::NullArgument {
                argument: "id".to_string()
            }
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = MarketDataError::EmptyValuationDate;
        let _: &dyn std::error::Error = &err;
        assert_eq!(err.clone(), err);
    }
}
