//! Currency pairs.
//!
//! A `CurrencyPair` is pure key data: it names the two currencies of an FX
//! rate without carrying the rate itself. Rates live in
//! [`FxRate`](crate::values::FxRate) values held by the market data store.
//!
//! # Examples
//!
//! ```
//! use market_core::types::{Currency, CurrencyPair};
//!
//! let pair = CurrencyPair::new(Currency::EUR, Currency::USD).unwrap();
//! assert_eq!(pair.to_string(), "EUR/USD");
//! assert_eq!(pair.inverse().to_string(), "USD/EUR");
//! ```

use std::fmt;
use std::str::FromStr;

use super::currency::Currency;
use super::error::CurrencyError;

/// An ordered pair of distinct currencies, BASE/QUOTE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrencyPair {
    base: Currency,
    quote: Currency,
}

impl CurrencyPair {
    /// Creates a currency pair.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::SameCurrency` if base and quote are equal.
    pub fn new(base: Currency, quote: Currency) -> Result<Self, CurrencyError> {
        if base == quote {
            return Err(CurrencyError::SameCurrency(base.code().to_string()));
        }
        Ok(Self { base, quote })
    }

    /// Returns the base currency.
    #[inline]
    pub fn base(&self) -> Currency {
        self.base
    }

    /// Returns the quote currency.
    #[inline]
    pub fn quote(&self) -> Currency {
        self.quote
    }

    /// Returns the pair with base and quote swapped.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }

    /// Returns true if `currency` is either side of the pair.
    pub fn contains(&self, currency: Currency) -> bool {
        self.base == currency || self.quote == currency
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = CurrencyError;

    /// Parses `BASE/QUOTE`, e.g. `EUR/USD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| CurrencyError::ParseError(s.to_string()))?;
        CurrencyPair::new(base.parse()?, quote.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_currency_rejected() {
        let result = CurrencyPair::new(Currency::USD, Currency::USD);
        assert_eq!(result, Err(CurrencyError::SameCurrency("USD".to_string())));
    }

    #[test]
    fn test_inverse() {
        let pair = CurrencyPair::new(Currency::USD, Currency::KRW).unwrap();
        let inv = pair.inverse();
        assert_eq!(inv.base(), Currency::KRW);
        assert_eq!(inv.quote(), Currency::USD);
        assert_eq!(inv.inverse(), pair);
    }

    #[test]
    fn test_parse() {
        let pair: CurrencyPair = "gbp/usd".parse().unwrap();
        assert_eq!(pair.base(), Currency::GBP);
        assert!(pair.contains(Currency::USD));
        assert!(!pair.contains(Currency::EUR));
        assert!("GBPUSD".parse::<CurrencyPair>().is_err());
    }
}
