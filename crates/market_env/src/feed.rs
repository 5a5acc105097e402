//! Loading observable quotes and histories from a market data provider.
//!
//! The loader translates each requested [`ObservableId`] with a
//! [`VendorIdMapping`] before asking the provider, and files the result under
//! the identifier the calculations asked for.

use std::collections::HashMap;

use market_core::ids::ObservableId;
use market_core::timeseries::DateSeries;
use tracing::{debug, info};

use crate::builder::MarketDataStoreBuilder;
use crate::mapping::VendorIdMapping;

/// Source of observable market data keyed by vendor identifier.
pub trait MarketDataProvider {
    /// Latest quote of `id`, if available.
    fn quote(&self, id: &ObservableId) -> Option<f64>;

    /// History of `id`, if available.
    fn history(&self, id: &ObservableId) -> Option<DateSeries>;
}

/// Provider backed by in-memory maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    quotes: HashMap<ObservableId, f64>,
    histories: HashMap<ObservableId, DateSeries>,
}

impl InMemoryProvider {
    /// An empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a quote.
    pub fn with_quote(mut self, id: ObservableId, value: f64) -> Self {
        self.quotes.insert(id, value);
        self
    }

    /// Adds a history.
    pub fn with_history(mut self, id: ObservableId, series: DateSeries) -> Self {
        self.histories.insert(id, series);
        self
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn quote(&self, id: &ObservableId) -> Option<f64> {
        self.quotes.get(id).copied()
    }

    fn history(&self, id: &ObservableId) -> Option<DateSeries> {
        self.histories.get(id).cloned()
    }
}

/// Outcome of a load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Quotes added to the builder.
    pub quotes_loaded: usize,
    /// Histories added to the builder.
    pub series_loaded: usize,
    /// Requested identifiers the provider had no quote for.
    pub missing_quotes: Vec<ObservableId>,
    /// Requested identifiers the provider had no history for.
    pub missing_series: Vec<ObservableId>,
}

impl LoadReport {
    /// True if every requested item was found.
    pub fn is_complete(&self) -> bool {
        self.missing_quotes.is_empty() && self.missing_series.is_empty()
    }
}

/// Feeds provider data into a [`MarketDataStoreBuilder`].
///
/// # Examples
///
/// ```
/// use market_core::ids::{MarketDataVendor, ObservableId, StandardId};
/// use market_env::builder::MarketDataStoreBuilder;
/// use market_env::feed::{InMemoryProvider, ObservableLoader};
///
/// let id = ObservableId::new(StandardId::of("OG-Ticker", "EURUSD").unwrap());
/// let vendor_id = id.clone().with_vendor(MarketDataVendor::new("BBG"));
///
/// let provider = InMemoryProvider::new().with_quote(vendor_id, 1.09);
/// let mapping = |id: &ObservableId| id.clone().with_vendor(MarketDataVendor::new("BBG"));
/// let loader = ObservableLoader::new(provider, mapping);
///
/// let mut builder = MarketDataStoreBuilder::new();
/// let report = loader.load_quotes(&mut builder, [id.clone()]);
/// assert!(report.is_complete());
///
/// let store = builder.build();
/// assert_eq!(*store.value(&id.to_market_data_id()).unwrap().get(0).unwrap(), 1.09);
/// ```
#[derive(Debug, Clone)]
pub struct ObservableLoader<P, M> {
    provider: P,
    mapping: M,
}

impl<P, M> ObservableLoader<P, M>
where
    P: MarketDataProvider,
    M: VendorIdMapping,
{
    /// A loader querying `provider` through `mapping`.
    pub fn new(provider: P, mapping: M) -> Self {
        Self { provider, mapping }
    }

    /// Adds the quote of each id to `builder` as a single value.
    pub fn load_quotes<I>(&self, builder: &mut MarketDataStoreBuilder, ids: I) -> LoadReport
    where
        I: IntoIterator<Item = ObservableId>,
    {
        let mut report = LoadReport::default();
        for id in ids {
            let vendor_id = self.mapping.id_for_vendor(&id);
            match self.provider.quote(&vendor_id) {
                Some(value) => {
                    builder.add_value(&id.to_market_data_id(), value);
                    report.quotes_loaded += 1;
                }
                None => {
                    debug!(id = %id, vendor_id = %vendor_id, "no quote available");
                    report.missing_quotes.push(id);
                }
            }
        }
        info!(
            loaded = report.quotes_loaded,
            missing = report.missing_quotes.len(),
            "loaded observable quotes"
        );
        report
    }

    /// Adds the history of each id to `builder`.
    pub fn load_time_series<I>(&self, builder: &mut MarketDataStoreBuilder, ids: I) -> LoadReport
    where
        I: IntoIterator<Item = ObservableId>,
    {
        let mut report = LoadReport::default();
        for id in ids {
            let vendor_id = self.mapping.id_for_vendor(&id);
            match self.provider.history(&vendor_id) {
                Some(series) => {
                    builder.add_time_series(id, series);
                    report.series_loaded += 1;
                }
                None => {
                    debug!(id = %id, vendor_id = %vendor_id, "no history available");
                    report.missing_series.push(id);
                }
            }
        }
        info!(
            loaded = report.series_loaded,
            missing = report.missing_series.len(),
            "loaded observable histories"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{IdentityMapping, StandardIdTable};
    use market_core::ids::StandardId;
    use market_core::types::Date;

    fn obs(value: &str) -> ObservableId {
        ObservableId::new(StandardId::of("OG-Ticker", value).unwrap())
    }

    #[test]
    fn test_missing_quotes_are_reported() {
        let provider = InMemoryProvider::new().with_quote(obs("A"), 1.0);
        let loader = ObservableLoader::new(provider, IdentityMapping);
        let mut builder = MarketDataStoreBuilder::new();

        let report = loader.load_quotes(&mut builder, [obs("A"), obs("B")]);
        assert_eq!(report.quotes_loaded, 1);
        assert_eq!(report.missing_quotes, vec![obs("B")]);
        assert!(!report.is_complete());
        assert!(builder.contains(&obs("A").to_market_data_id()));
        assert!(!builder.contains(&obs("B").to_market_data_id()));
    }

    #[test]
    fn test_mapping_applied_before_lookup() {
        let vendor_std = StandardId::of("BBG-Ticker", "A Index").unwrap();
        let provider = InMemoryProvider::new().with_quote(ObservableId::new(vendor_std.clone()), 5.0);
        let mapping = StandardIdTable::new().with_entry(obs("A").standard_id().clone(), vendor_std);
        let loader = ObservableLoader::new(provider, mapping);
        let mut builder = MarketDataStoreBuilder::new();

        let report = loader.load_quotes(&mut builder, [obs("A")]);
        assert!(report.is_complete());
        let store = builder.build();
        assert_eq!(*store.value(&obs("A").to_market_data_id()).unwrap().get(0).unwrap(), 5.0);
    }

    #[test]
    fn test_load_time_series() {
        let d = Date::from_ymd(2024, 5, 1).unwrap();
        let provider = InMemoryProvider::new().with_history(obs("A"), DateSeries::from_points([(d, 0.5)]));
        let loader = ObservableLoader::new(provider, IdentityMapping);
        let mut builder = MarketDataStoreBuilder::new();

        let report = loader.load_time_series(&mut builder, [obs("A"), obs("B")]);
        assert_eq!(report.series_loaded, 1);
        assert_eq!(report.missing_series, vec![obs("B")]);

        let store = builder.build();
        assert_eq!(store.time_series(&obs("A")).get(d), Some(0.5));
        assert!(store.time_series(&obs("B")).is_empty());
    }
}
