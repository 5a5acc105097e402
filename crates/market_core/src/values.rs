//! Market data value types consumed by calculation functions.
//!
//! - [`FxRate`]: spot rate of a currency pair
//! - [`FxRateScenarioArray`]: one rate per scenario for a single pair
//! - [`DiscountFactors`]: continuously compounded discounting in one currency

use crate::error::MarketDataError;
use crate::ids::{MarketDataId, MarketDataKey};
use crate::scenario::{FromScenarioBox, ScenarioArray, ScenarioBox};
use crate::types::{Currency, CurrencyError, CurrencyPair, Date, DayCountConvention};

/// Spot FX rate: units of quote currency per unit of base currency.
///
/// # Examples
///
/// ```
/// use market_core::types::{Currency, CurrencyPair};
/// use market_core::values::FxRate;
///
/// let pair = CurrencyPair::new(Currency::EUR, Currency::USD).unwrap();
/// let rate = FxRate::new(pair, 1.10).unwrap();
///
/// let usd = rate.convert(100.0, Currency::EUR).unwrap();
/// assert!((usd - 110.0).abs() < 1e-9);
/// assert!(FxRate::new(pair, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxRate {
    pair: CurrencyPair,
    rate: f64,
}

impl FxRate {
    /// Creates a rate for `pair`.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::InvalidRate` if `rate` is not a positive finite
    /// number.
    pub fn new(pair: CurrencyPair, rate: f64) -> Result<Self, CurrencyError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(CurrencyError::InvalidRate(rate));
        }
        Ok(Self { pair, rate })
    }

    /// Identifier of the FX rate of `pair`.
    pub fn id(pair: CurrencyPair) -> MarketDataId<FxRate> {
        MarketDataId::new(MarketDataKey::FxRate(pair))
    }

    /// The currency pair.
    #[inline]
    pub fn pair(&self) -> CurrencyPair {
        self.pair
    }

    /// The rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The rate of the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            pair: self.pair.inverse(),
            rate: 1.0 / self.rate,
        }
    }

    /// Converts `amount` held in `from` into the other currency of the pair.
    ///
    /// Returns `None` if `from` is not part of the pair.
    pub fn convert(&self, amount: f64, from: Currency) -> Option<f64> {
        if from == self.pair.base() {
            Some(amount * self.rate)
        } else if from == self.pair.quote() {
            Some(amount / self.rate)
        } else {
            None
        }
    }
}

/// FX rates of one currency pair, one per scenario.
///
/// Calculation functions pricing many FX trades over the same pair request
/// this aggregate once through the calculation view instead of reading the
/// scenario box index by index.
#[derive(Debug, Clone, PartialEq)]
pub struct FxRateScenarioArray {
    pair: CurrencyPair,
    rates: Vec<FxRate>,
}

impl FxRateScenarioArray {
    /// Creates the array from per-scenario rates.
    ///
    /// # Errors
    ///
    /// - `InvalidCardinality` if `rates` is empty
    /// - `InvalidRate` if any rate is not positive
    pub fn new(pair: CurrencyPair, rates: &[f64]) -> Result<Self, FxRateArrayError> {
        if rates.is_empty() {
            return Err(MarketDataError::InvalidCardinality { count: 0 }.into());
        }
        let rates = rates
            .iter()
            .map(|&r| FxRate::new(pair, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pair, rates })
    }

    /// The currency pair.
    pub fn pair(&self) -> CurrencyPair {
        self.pair
    }

    /// Rate in `scenario`.
    pub fn rate(&self, scenario: usize) -> Option<f64> {
        self.rates.get(scenario).map(FxRate::rate)
    }

    /// Converts `amount` in every scenario.
    ///
    /// Returns `None` if `from` is not part of the pair.
    pub fn convert(&self, amount: f64, from: Currency) -> Option<Vec<f64>> {
        self.rates.iter().map(|r| r.convert(amount, from)).collect()
    }
}

impl ScenarioArray<FxRate> for FxRateScenarioArray {
    fn scenario_count(&self) -> usize {
        self.rates.len()
    }

    fn value(&self, scenario: usize) -> Option<&FxRate> {
        self.rates.get(scenario)
    }
}

impl FromScenarioBox<FxRate> for FxRateScenarioArray {
    fn from_box(source: &ScenarioBox<FxRate>, scenario_count: usize) -> Result<Self, MarketDataError> {
        let rates: Vec<FxRate> = source.iter(scenario_count)?.copied().collect();
        // iter() rejects a zero count, so there is a first rate
        let pair = rates
            .first()
            .map(FxRate::pair)
            .ok_or(MarketDataError::InvalidCardinality { count: 0 })?;
        Ok(Self { pair, rates })
    }
}

/// Failure building an [`FxRateScenarioArray`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FxRateArrayError {
    /// Cardinality failure.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
    /// A rate was rejected.
    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

/// Discount factors of one currency from a flat continuously compounded
/// zero rate.
///
/// `D(t) = exp(-r * t)` with `t` the year fraction from the valuation date.
///
/// ```
/// use market_core::types::{Currency, Date, DayCountConvention};
/// use market_core::values::DiscountFactors;
///
/// let val = Date::from_ymd(2024, 1, 1).unwrap();
/// let df = DiscountFactors::new(Currency::USD, val, 0.05, DayCountConvention::ActualActual365);
/// let one_year = Date::from_ymd(2024, 12, 31).unwrap();
///
/// assert!((df.discount_factor(one_year) - (-0.05_f64).exp()).abs() < 1e-12);
/// assert_eq!(df.discount_factor(val), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountFactors {
    currency: Currency,
    valuation_date: Date,
    zero_rate: f64,
    day_count: DayCountConvention,
}

impl DiscountFactors {
    /// Creates discount factors.
    pub fn new(
        currency: Currency,
        valuation_date: Date,
        zero_rate: f64,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            currency,
            valuation_date,
            zero_rate,
            day_count,
        }
    }

    /// Identifier of the discount factors of `currency`.
    pub fn id(currency: Currency) -> MarketDataId<DiscountFactors> {
        MarketDataId::new(MarketDataKey::DiscountCurve(currency))
    }

    /// The currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// The valuation date.
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// The zero rate.
    pub fn zero_rate(&self) -> f64 {
        self.zero_rate
    }

    /// The day count used to measure time.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Year fraction from the valuation date to `date`.
    pub fn relative_time(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.valuation_date, date)
    }

    /// Discount factor at time `t` in years.
    pub fn discount_factor_at(&self, t: f64) -> f64 {
        (-self.zero_rate * t).exp()
    }

    /// Discount factor for a payment on `date`.
    pub fn discount_factor(&self, date: Date) -> f64 {
        self.discount_factor_at(self.relative_time(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eur_usd() -> CurrencyPair {
        CurrencyPair::new(Currency::EUR, Currency::USD).unwrap()
    }

    // ========================================
    // FxRate Tests
    // ========================================

    #[test]
    fn test_fx_rate_rejects_non_positive() {
        assert_eq!(
            FxRate::new(eur_usd(), -1.0).unwrap_err(),
            CurrencyError::InvalidRate(-1.0)
        );
        assert!(FxRate::new(eur_usd(), f64::NAN).is_err());
        assert!(FxRate::new(eur_usd(), f64::INFINITY).is_err());
    }

    #[test]
    fn test_fx_rate_inverse_and_convert() {
        let rate = FxRate::new(eur_usd(), 1.25).unwrap();
        let inv = rate.inverse();
        assert_eq!(inv.pair(), eur_usd().inverse());
        assert_relative_eq!(inv.rate(), 0.8, epsilon = 1e-12);

        assert_relative_eq!(rate.convert(125.0, Currency::USD).unwrap(), 100.0, epsilon = 1e-12);
        assert_eq!(rate.convert(1.0, Currency::JPY), None);
    }

    #[test]
    fn test_fx_rate_id() {
        let id = FxRate::id(eur_usd());
        assert_eq!(id.key(), &MarketDataKey::FxRate(eur_usd()));
        assert!(id.value_type().is::<FxRate>());
    }

    // ========================================
    // FxRateScenarioArray Tests
    // ========================================

    #[test]
    fn test_scenario_array_new() {
        let array = FxRateScenarioArray::new(eur_usd(), &[1.1, 1.2, 1.3]).unwrap();
        assert_eq!(array.scenario_count(), 3);
        assert_eq!(array.rate(1), Some(1.2));
        assert_eq!(array.rate(3), None);

        assert!(matches!(
            FxRateScenarioArray::new(eur_usd(), &[]),
            Err(FxRateArrayError::MarketData(MarketDataError::InvalidCardinality { count: 0 }))
        ));
        assert!(matches!(
            FxRateScenarioArray::new(eur_usd(), &[1.1, 0.0]),
            Err(FxRateArrayError::Currency(_))
        ));
    }

    #[test]
    fn test_scenario_array_from_single_box() {
        let rate = FxRate::new(eur_usd(), 1.1).unwrap();
        let array = FxRateScenarioArray::from_box(&ScenarioBox::of_single(rate), 4).unwrap();
        assert_eq!(array.pair(), eur_usd());
        assert_eq!(array.scenario_count(), 4);
        assert!((0..4).all(|i| array.rate(i) == Some(1.1)));
    }

    #[test]
    fn test_scenario_array_convert() {
        let array = FxRateScenarioArray::new(eur_usd(), &[1.0, 2.0]).unwrap();
        assert_eq!(array.convert(10.0, Currency::EUR), Some(vec![10.0, 20.0]));
        assert_eq!(array.convert(10.0, Currency::GBP), None);
    }

    // ========================================
    // DiscountFactors Tests
    // ========================================

    #[test]
    fn test_discount_factors() {
        let val = Date::from_ymd(2024, 1, 1).unwrap();
        let df = DiscountFactors::new(Currency::USD, val, 0.03, DayCountConvention::ActualActual360);
        let date = Date::from_ymd(2024, 7, 1).unwrap();
        let t = 182.0 / 360.0;

        assert_relative_eq!(df.relative_time(date), t, epsilon = 1e-12);
        assert_relative_eq!(df.discount_factor(date), (-0.03 * t).exp(), epsilon = 1e-12);
        assert_eq!(DiscountFactors::id(Currency::USD).key(), &MarketDataKey::DiscountCurve(Currency::USD));
    }
}
