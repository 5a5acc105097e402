//! Static market data snapshots described in TOML.
//!
//! Snapshots are test and demo input: a quick way to assemble a builder from
//! a hand-written file. They are not a storage format for market data, and a
//! store is never written back to one.
//!
//! A snapshot lists valuation dates, FX rates, discount curves, quotes and
//! histories. Every list of per-scenario numbers with one element becomes a
//! single value; a longer list becomes one value per scenario.
//!
//! ```toml
//! valuation_dates = ["2024-03-01"]
//!
//! [[fx_rates]]
//! base = "EUR"
//! quote = "USD"
//! rates = [1.08, 1.09, 1.10]
//!
//! [[discount_curves]]
//! currency = "USD"
//! zero_rates = [0.05]
//! day_count = "ACT/360"
//!
//! [[quotes]]
//! scheme = "OG-Ticker"
//! value = "SOFR"
//! vendor = "BBG"
//! values = [0.053]
//!
//! [[time_series]]
//! scheme = "OG-Ticker"
//! value = "SOFR"
//! points = [{ date = "2024-02-28", value = 0.0531 }]
//! ```

use std::path::{Path, PathBuf};

use market_core::error::MarketDataError;
use market_core::ids::{FieldName, MarketDataValue, MarketDataVendor, ObservableId, StandardId};
use market_core::scenario::ScenarioBox;
use market_core::timeseries::DateSeries;
use market_core::types::{Currency, CurrencyPair, Date, DayCountConvention};
use market_core::values::{DiscountFactors, FxRate, FxRateArrayError, FxRateScenarioArray};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::builder::MarketDataStoreBuilder;
use crate::erased::ErasedBox;

/// Snapshot loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The snapshot file could not be read.
    #[error("Failed to read snapshot file {}: {source}", path.display())]
    Io {
        /// Path of the file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not valid TOML or has the wrong shape.
    #[error("Failed to parse snapshot TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value that cannot be interpreted.
    #[error("Invalid field {field}: {message}")]
    InvalidField {
        /// Dotted path of the field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// The snapshot data was rejected by the builder.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl ToString) -> Self {
        ConfigError::InvalidField {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

/// FX rates of one currency pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FxRateConfig {
    /// Base currency code
    pub base: String,
    /// Quote currency code
    pub quote: String,
    /// One rate, or one rate per scenario
    pub rates: Vec<f64>,
}

/// Flat discount curve of one currency.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscountCurveConfig {
    /// Currency code
    pub currency: String,
    /// One zero rate, or one per scenario
    pub zero_rates: Vec<f64>,
    /// Day count name; ACT/365 if omitted
    #[serde(default)]
    pub day_count: Option<String>,
}

/// Quote of an observable.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteConfig {
    /// Standard ID scheme
    pub scheme: String,
    /// Standard ID value
    pub value: String,
    /// Field name; MarketValue if omitted
    #[serde(default)]
    pub field: Option<String>,
    /// Vendor; None if omitted
    #[serde(default)]
    pub vendor: Option<String>,
    /// One value, or one per scenario
    pub values: Vec<f64>,
}

/// One observation of a history.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointConfig {
    /// ISO date
    pub date: String,
    /// Observed value
    pub value: f64,
}

/// History of an observable.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeSeriesConfig {
    /// Standard ID scheme
    pub scheme: String,
    /// Standard ID value
    pub value: String,
    /// Field name; MarketValue if omitted
    #[serde(default)]
    pub field: Option<String>,
    /// Vendor; None if omitted
    #[serde(default)]
    pub vendor: Option<String>,
    /// Observations in any order
    #[serde(default)]
    pub points: Vec<PointConfig>,
}

/// A static market data set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketDataSnapshot {
    /// One valuation date, or one per scenario
    pub valuation_dates: Vec<String>,
    /// FX rates
    pub fx_rates: Vec<FxRateConfig>,
    /// Discount curves
    pub discount_curves: Vec<DiscountCurveConfig>,
    /// Observable quotes
    pub quotes: Vec<QuoteConfig>,
    /// Observable histories
    pub time_series: Vec<TimeSeriesConfig>,
}

impl MarketDataSnapshot {
    /// Loads a snapshot from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a snapshot from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Adds the snapshot to `builder`.
    ///
    /// Either everything is added or, on error, `builder` is left unchanged.
    pub fn apply(&self, builder: &mut MarketDataStoreBuilder) -> Result<(), ConfigError> {
        let mut staged = builder.clone();

        let dates = self.valuation_dates()?;
        if let Some(dates) = &dates {
            staged.valuation_date_box(dates.clone())?;
        }

        let mut boxes = Vec::new();
        for (i, fx) in self.fx_rates.iter().enumerate() {
            let (pair, boxed) = fx_box(fx, i)?;
            boxes.push((FxRate::id(pair).erase(), boxed));
        }
        for (i, curve) in self.discount_curves.iter().enumerate() {
            let dates = dates.as_ref().ok_or_else(|| {
                ConfigError::invalid(
                    format!("discount_curves[{}]", i),
                    "a valuation date is required",
                )
            })?;
            let (currency, boxed) = curve_box(curve, dates, i)?;
            boxes.push((DiscountFactors::id(currency).erase(), boxed));
        }
        for (i, quote) in self.quotes.iter().enumerate() {
            let id = observable_id(&quote.scheme, &quote.value, &quote.field, &quote.vendor)?;
            let boxed = to_box(quote.values.clone(), &format!("quotes[{}].values", i))?;
            boxes.push((id.to_market_data_id().erase(), ErasedBox::new(boxed)));
        }
        staged.add_boxed_values(boxes)?;

        for (i, series) in self.time_series.iter().enumerate() {
            let id = observable_id(&series.scheme, &series.value, &series.field, &series.vendor)?;
            let points = series
                .points
                .iter()
                .enumerate()
                .map(|(j, p)| {
                    parse_date(&p.date, &format!("time_series[{}].points[{}].date", i, j))
                        .map(|d| (d, p.value))
                })
                .collect::<Result<DateSeries, _>>()?;
            staged.add_time_series(id, points);
        }

        info!(
            fx_rates = self.fx_rates.len(),
            discount_curves = self.discount_curves.len(),
            quotes = self.quotes.len(),
            time_series = self.time_series.len(),
            "applied market data snapshot"
        );
        *builder = staged;
        Ok(())
    }

    /// A builder holding only this snapshot.
    pub fn to_builder(&self) -> Result<MarketDataStoreBuilder, ConfigError> {
        let mut builder = MarketDataStoreBuilder::new();
        self.apply(&mut builder)?;
        Ok(builder)
    }

    fn valuation_dates(&self) -> Result<Option<ScenarioBox<Date>>, ConfigError> {
        if self.valuation_dates.is_empty() {
            return Ok(None);
        }
        let dates = self
            .valuation_dates
            .iter()
            .enumerate()
            .map(|(i, s)| parse_date(s, &format!("valuation_dates[{}]", i)))
            .collect::<Result<Vec<_>, _>>()?;
        to_box(dates, "valuation_dates").map(Some)
    }
}

fn parse_date(s: &str, field: &str) -> Result<Date, ConfigError> {
    Date::parse(s).map_err(|e| ConfigError::invalid(field, e))
}

fn parse_currency(s: &str, field: &str) -> Result<Currency, ConfigError> {
    s.parse::<Currency>().map_err(|e| ConfigError::invalid(field, e))
}

/// Single box for one element, multi box for more.
fn to_box<T: MarketDataValue>(
    mut values: Vec<T>,
    field: &str,
) -> Result<ScenarioBox<T>, ConfigError> {
    match values.len() {
        0 => Err(ConfigError::invalid(field, "at least one value is required")),
        1 => Ok(ScenarioBox::of_single(values.remove(0))),
        _ => Ok(ScenarioBox::of_multi(values)?),
    }
}

fn observable_id(
    scheme: &str,
    value: &str,
    field: &Option<String>,
    vendor: &Option<String>,
) -> Result<ObservableId, ConfigError> {
    let mut id = ObservableId::new(StandardId::of(scheme, value)?);
    if let Some(field) = field {
        id = id.with_field(FieldName::new(field.as_str()));
    }
    if let Some(vendor) = vendor {
        id = id.with_vendor(MarketDataVendor::new(vendor.as_str()));
    }
    Ok(id)
}

fn fx_box(fx: &FxRateConfig, i: usize) -> Result<(CurrencyPair, ErasedBox), ConfigError> {
    let base = parse_currency(&fx.base, &format!("fx_rates[{}].base", i))?;
    let quote = parse_currency(&fx.quote, &format!("fx_rates[{}].quote", i))?;
    let pair = CurrencyPair::new(base, quote).map_err(|e| ConfigError::invalid(format!("fx_rates[{}]", i), e))?;
    let field = format!("fx_rates[{}].rates", i);

    let boxed = match fx.rates.as_slice() {
        [] => return Err(ConfigError::invalid(field, "at least one rate is required")),
        [rate] => ScenarioBox::of_single(FxRate::new(pair, *rate).map_err(|e| ConfigError::invalid(&field, e))?),
        rates => {
            let array = FxRateScenarioArray::new(pair, rates).map_err(|e| match e {
                FxRateArrayError::MarketData(e) => ConfigError::MarketData(e),
                FxRateArrayError::Currency(e) => ConfigError::invalid(&field, e),
            })?;
            ScenarioBox::of_array(array)?
        }
    };
    Ok((pair, ErasedBox::new(boxed)))
}

/// Per-scenario discount factors; a one-element list is used in every
/// scenario.
fn curve_box(
    curve: &DiscountCurveConfig,
    dates: &ScenarioBox<Date>,
    i: usize,
) -> Result<(Currency, ErasedBox), ConfigError> {
    let currency = parse_currency(&curve.currency, &format!("discount_curves[{}].currency", i))?;
    let day_count = match &curve.day_count {
        Some(name) => name
            .parse::<DayCountConvention>()
            .map_err(|e| ConfigError::invalid(format!("discount_curves[{}].day_count", i), e))?,
        None => DayCountConvention::default(),
    };
    let rates = to_box(curve.zero_rates.clone(), &format!("discount_curves[{}].zero_rates", i))?;

    let boxed = if rates.is_single() && dates.is_single() {
        let date = *dates.get(0)?;
        rates.map(|r| DiscountFactors::new(currency, date, *r, day_count))
    } else {
        let count = rates.scenario_count().max(dates.scenario_count());
        let rates = rates.iter(count)?;
        let dates = dates.iter(count)?;
        let factors = dates
            .zip(rates)
            .map(|(d, r)| DiscountFactors::new(currency, *d, *r, day_count))
            .collect();
        ScenarioBox::of_multi(factors)?
    };
    Ok((currency, ErasedBox::new(boxed)))
}
