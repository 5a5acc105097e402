//! Incremental, validated assembly of a [`MarketDataStore`].
//!
//! Values may arrive from several sources in several batches. Each batch is
//! validated in full before anything is inserted:
//!
//! 1. Type check: the runtime type of every value must equal the type
//!    declared by its identifier.
//! 2. Scenario reconciliation: a single value imposes nothing. A
//!    multi-scenario box with `n` values fixes the scenario count at `n` if
//!    the count is unset or 1, and is rejected if the count is already some
//!    other `m > 1`.
//!
//! A rejected batch leaves the builder exactly as it was.

use std::collections::HashMap;

use market_core::error::{MarketDataError, MarketDataResult};
use market_core::ids::{AnyMarketDataId, MarketDataId, MarketDataValue, ObservableId};
use market_core::scenario::ScenarioBox;
use market_core::timeseries::DateSeries;
use market_core::types::Date;
use tracing::{debug, trace, warn};

use crate::erased::{ErasedBox, RawValue};
use crate::store::MarketDataStore;

/// Mutable accumulator of market data producing immutable stores.
///
/// The builder remains usable after [`build`](Self::build); stores already
/// built are unaffected by later changes.
///
/// # Examples
///
/// ```
/// use market_core::ids::MarketDataId;
/// use market_core::scenario::ScenarioBox;
/// use market_env::builder::MarketDataStoreBuilder;
///
/// let spot: MarketDataId<f64> = MarketDataId::named("spot");
/// let vol: MarketDataId<f64> = MarketDataId::named("vol");
///
/// let mut builder = MarketDataStoreBuilder::new();
/// builder
///     .add_boxed_value(&spot, ScenarioBox::of_multi(vec![100.0, 101.0]).unwrap())
///     .unwrap();
///
/// // A box with another scenario count is rejected
/// let err = builder.add_boxed_value(&vol, ScenarioBox::of_multi(vec![0.2, 0.3, 0.4]).unwrap());
/// assert!(err.is_err());
///
/// let store = builder.build();
/// assert_eq!(store.scenario_count(), 2);
/// assert!(!store.contains(&vol));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarketDataStoreBuilder {
    valuation_date: Option<ScenarioBox<Date>>,
    scenario_count: Option<usize>,
    values: HashMap<AnyMarketDataId, ErasedBox>,
    time_series: HashMap<ObservableId, DateSeries>,
}

impl MarketDataStoreBuilder {
    /// An empty builder with no scenario count.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        valuation_date: Option<ScenarioBox<Date>>,
        scenario_count: Option<usize>,
        values: HashMap<AnyMarketDataId, ErasedBox>,
        time_series: HashMap<ObservableId, DateSeries>,
    ) -> Self {
        Self {
            valuation_date,
            scenario_count,
            values,
            time_series,
        }
    }

    /// Scenario count established so far, if any.
    pub fn scenario_count(&self) -> Option<usize> {
        self.scenario_count
    }

    /// True if a value is held under `id`.
    pub fn contains<T: 'static>(&self, id: &MarketDataId<T>) -> bool {
        self.values.contains_key(&id.erase())
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no values are held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Adds a value used by every scenario, replacing any value under `id`.
    pub fn add_value<T: MarketDataValue>(&mut self, id: &MarketDataId<T>, value: T) -> &mut Self {
        trace!(id = %id, "adding single value");
        self.values
            .insert(id.erase(), ErasedBox::new(ScenarioBox::of_single(value)));
        self
    }

    /// Adds values whose types are only known at runtime.
    ///
    /// Each value is stored as a single-value box.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for the first value whose type differs from the
    /// type declared by its identifier; nothing is added in that case.
    pub fn add_values<I>(&mut self, values: I) -> MarketDataResult<&mut Self>
    where
        I: IntoIterator<Item = (AnyMarketDataId, RawValue)>,
    {
        let values: Vec<(AnyMarketDataId, RawValue)> = values.into_iter().collect();
        for (id, value) in &values {
            if id.value_type() != value.value_type() {
                warn!(id = %id, actual = %value.value_type(), "rejecting raw value batch: type mismatch");
                return Err(MarketDataError::TypeMismatch {
                    id: id.to_string(),
                    value: format!("{:?}", value),
                    expected: id.value_type().name(),
                    actual: value.value_type().name(),
                });
            }
        }
        trace!(count = values.len(), "adding raw value batch");
        for (id, value) in values {
            self.values.insert(id, value.into_single_box());
        }
        Ok(self)
    }

    /// Adds a box, replacing any value under `id`.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioCountConflict` if `boxed` has several scenarios and
    /// their number disagrees with the scenario count already established.
    pub fn add_boxed_value<T: MarketDataValue>(
        &mut self,
        id: &MarketDataId<T>,
        boxed: ScenarioBox<T>,
    ) -> MarketDataResult<&mut Self> {
        self.add_boxed_values([(id.erase(), ErasedBox::new(boxed))])
    }

    /// Adds boxes whose value types are only known at runtime.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if a box's value type differs from its identifier's
    /// - `ScenarioCountConflict` if a box disagrees with the scenario count,
    ///   including a count established earlier in the same batch
    ///
    /// Nothing is added if any entry is rejected.
    pub fn add_boxed_values<I>(&mut self, values: I) -> MarketDataResult<&mut Self>
    where
        I: IntoIterator<Item = (AnyMarketDataId, ErasedBox)>,
    {
        let values: Vec<(AnyMarketDataId, ErasedBox)> = values.into_iter().collect();
        let mut scenario_count = self.scenario_count;
        for (id, boxed) in &values {
            if id.value_type() != boxed.value_type() {
                warn!(id = %id, actual = %boxed.value_type(), "rejecting box batch: type mismatch");
                return Err(MarketDataError::TypeMismatch {
                    id: id.to_string(),
                    value: format!("{:?}", boxed),
                    expected: id.value_type().name(),
                    actual: boxed.value_type().name(),
                });
            }
            scenario_count = reconcile(scenario_count, boxed.is_single(), boxed.scenario_count(), || {
                format!("{:?}", boxed)
            })?;
        }
        trace!(count = values.len(), "adding box batch");
        self.adopt_scenario_count(scenario_count);
        self.values.extend(values);
        Ok(self)
    }

    /// Adds the history of `id`, replacing any history already held.
    ///
    /// Histories are shared by every scenario.
    pub fn add_time_series(&mut self, id: ObservableId, series: DateSeries) -> &mut Self {
        self.time_series.insert(id, series);
        self
    }

    /// Adds several histories.
    pub fn add_time_series_map<I>(&mut self, series: I) -> &mut Self
    where
        I: IntoIterator<Item = (ObservableId, DateSeries)>,
    {
        self.time_series.extend(series);
        self
    }

    /// Sets one valuation date for every scenario.
    pub fn valuation_date(&mut self, date: Date) -> &mut Self {
        self.valuation_date = Some(ScenarioBox::of_single(date));
        self
    }

    /// Sets the valuation date of each scenario.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioCountConflict` if `dates` has several scenarios and
    /// their number disagrees with the scenario count already established.
    pub fn valuation_date_box(&mut self, dates: ScenarioBox<Date>) -> MarketDataResult<&mut Self> {
        let scenario_count = reconcile(
            self.scenario_count,
            dates.is_single(),
            dates.scenario_count(),
            || format!("{:?}", dates),
        )?;
        self.adopt_scenario_count(scenario_count);
        self.valuation_date = Some(dates);
        Ok(self)
    }

    /// Builds a store from the current contents.
    ///
    /// The scenario count defaults to 1 if no multi-scenario data was added.
    pub fn build(&self) -> MarketDataStore {
        let scenario_count = self.scenario_count.unwrap_or(1);
        debug!(
            scenario_count,
            values = self.values.len(),
            time_series = self.time_series.len(),
            "building market data store"
        );
        MarketDataStore::from_parts(
            self.valuation_date.clone(),
            scenario_count,
            self.values.clone(),
            self.time_series.clone(),
        )
    }

    fn adopt_scenario_count(&mut self, scenario_count: Option<usize>) {
        if scenario_count != self.scenario_count {
            debug!(
                previous = ?self.scenario_count,
                scenario_count = ?scenario_count,
                "adopting scenario count"
            );
            self.scenario_count = scenario_count;
        }
    }
}

/// Scenario count after adding a box with `count` scenarios.
///
/// A count of 1 is treated like an unset count, so a later box may replace
/// it with any other count.
fn reconcile(
    current: Option<usize>,
    is_single: bool,
    count: usize,
    describe: impl FnOnce() -> String,
) -> MarketDataResult<Option<usize>> {
    if is_single {
        return Ok(current);
    }
    match current {
        None | Some(1) => Ok(Some(count)),
        Some(expected) if expected == count => Ok(current),
        Some(expected) => {
            warn!(count, expected, "rejecting box: scenario count conflict");
            Err(MarketDataError::ScenarioCountConflict {
                value: describe(),
                count,
                expected,
            })
        }
    }
}
