//! Date, currency and related value types.
//!
//! This module provides:
//! - `time`: `Date` and `DayCountConvention`
//! - `currency`: ISO 4217 currency codes
//! - `currency_pair`: BASE/QUOTE currency pairs used as FX key data
//! - `error`: `DateError` and `CurrencyError`

pub mod currency;
pub mod currency_pair;
pub mod error;
pub mod time;

pub use currency::Currency;
pub use currency_pair::CurrencyPair;
pub use error::{CurrencyError, DateError};
pub use time::{Date, DayCountConvention};
