//! Immutable snapshot of scenario-aware market data.

use std::collections::HashMap;
use std::sync::Arc;

use market_core::error::{MarketDataError, MarketDataResult};
use market_core::ids::{AnyMarketDataId, MarketDataId, MarketDataValue, ObservableId};
use market_core::scenario::ScenarioBox;
use market_core::timeseries::DateSeries;
use market_core::types::Date;

use crate::builder::MarketDataStoreBuilder;
use crate::erased::ErasedBox;

static EMPTY_SERIES: DateSeries = DateSeries::new();

/// Market data for a calculation run over one or more scenarios.
///
/// A store is produced by [`MarketDataStoreBuilder::build`] and never changes
/// afterwards. Every multi-scenario box it holds was checked against the
/// scenario count when it was added, and every box was checked against the
/// type declared by its identifier.
///
/// Clones share the underlying maps, and a store may be read from any number
/// of threads at once.
///
/// # Examples
///
/// ```
/// use market_core::ids::MarketDataId;
/// use market_core::scenario::ScenarioBox;
/// use market_core::types::Date;
/// use market_env::builder::MarketDataStoreBuilder;
///
/// let id: MarketDataId<f64> = MarketDataId::named("EUR-ESTR-fixing");
/// let store = MarketDataStoreBuilder::new()
///     .valuation_date(Date::from_ymd(2024, 3, 1).unwrap())
///     .add_value(&id, 0.039)
///     .build();
///
/// assert_eq!(store.scenario_count(), 1);
/// assert_eq!(store.value(&id).unwrap(), &ScenarioBox::of_single(0.039));
/// assert!(store.valuation_date().unwrap().is_single());
/// ```
#[derive(Debug, Clone)]
pub struct MarketDataStore {
    valuation_date: Option<ScenarioBox<Date>>,
    scenario_count: usize,
    values: Arc<HashMap<AnyMarketDataId, ErasedBox>>,
    time_series: Arc<HashMap<ObservableId, DateSeries>>,
}

impl MarketDataStore {
    pub(crate) fn from_parts(
        valuation_date: Option<ScenarioBox<Date>>,
        scenario_count: usize,
        values: HashMap<AnyMarketDataId, ErasedBox>,
        time_series: HashMap<ObservableId, DateSeries>,
    ) -> Self {
        Self {
            valuation_date,
            scenario_count,
            values: Arc::new(values),
            time_series: Arc::new(time_series),
        }
    }

    /// A store with no data and a single scenario.
    pub fn empty() -> Self {
        Self::from_parts(None, 1, HashMap::new(), HashMap::new())
    }

    /// The valuation date of each scenario.
    ///
    /// # Errors
    ///
    /// Returns `EmptyValuationDate` if no valuation date was set.
    pub fn valuation_date(&self) -> MarketDataResult<&ScenarioBox<Date>> {
        self.valuation_date
            .as_ref()
            .ok_or(MarketDataError::EmptyValuationDate)
    }

    /// Number of scenarios; at least 1.
    #[inline]
    pub fn scenario_count(&self) -> usize {
        self.scenario_count
    }

    /// The box stored under `id`.
    ///
    /// # Errors
    ///
    /// - `KeyNotFound` if nothing is stored under `id`
    /// - `TypeMismatch` if the stored box does not hold `T`
    pub fn value<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> MarketDataResult<&ScenarioBox<T>> {
        let erased = self
            .values
            .get(&id.erase())
            .ok_or_else(|| MarketDataError::KeyNotFound { id: id.to_string() })?;
        erased
            .downcast_ref::<T>()
            .ok_or_else(|| MarketDataError::TypeMismatch {
                id: id.to_string(),
                value: format!("{:?}", erased),
                expected: id.value_type().name(),
                actual: erased.value_type().name(),
            })
    }

    /// The type-erased box stored under `id`, if any.
    pub fn erased_value(&self, id: &AnyMarketDataId) -> Option<&ErasedBox> {
        self.values.get(id)
    }

    /// The history of `id`; empty if none was added.
    pub fn time_series(&self, id: &ObservableId) -> &DateSeries {
        self.time_series.get(id).unwrap_or(&EMPTY_SERIES)
    }

    /// True if a value is stored under `id`.
    pub fn contains<T: 'static>(&self, id: &MarketDataId<T>) -> bool {
        self.values.contains_key(&id.erase())
    }

    /// Identifiers of all stored values, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &AnyMarketDataId> + '_ {
        self.values.keys()
    }

    /// Identifiers of all stored time series, in no particular order.
    pub fn observable_ids(&self) -> impl Iterator<Item = &ObservableId> + '_ {
        self.time_series.keys()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A builder seeded with the contents of this store.
    ///
    /// The builder starts with this store's scenario count; changes made
    /// through it never affect this store.
    pub fn to_builder(&self) -> MarketDataStoreBuilder {
        MarketDataStoreBuilder::from_parts(
            self.valuation_date.clone(),
            Some(self.scenario_count),
            HashMap::clone(&self.values),
            HashMap::clone(&self.time_series),
        )
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::empty()
    }
}
