//! Read access to market data for calculation functions.
//!
//! Calculation functions see market data only through
//! [`CalculationMarketData`]. They ask for exactly the keys they need and can
//! obtain per-scenario aggregates without caring whether the underlying data
//! is a single value or one value per scenario.

use std::marker::PhantomData;
use std::sync::Arc;

use market_core::error::MarketDataResult;
use market_core::ids::{MarketDataId, MarketDataValue, ObservableId};
use market_core::scenario::{AsAny, FromScenarioBox, ScenarioBox};
use market_core::timeseries::DateSeries;
use market_core::types::Date;

use crate::store::MarketDataStore;

/// Key for a per-scenario aggregate derived from a stored value.
pub trait ScenarioMarketDataKey {
    /// Type of the stored value.
    type Value: MarketDataValue;

    /// Aggregate holding one value per scenario.
    type Aggregate: FromScenarioBox<Self::Value>;

    /// Identifier of the stored value.
    fn market_data_id(&self) -> MarketDataId<Self::Value>;
}

/// A [`ScenarioMarketDataKey`] for aggregate `A` built from values of `T`.
///
/// ```
/// use market_core::types::{Currency, CurrencyPair};
/// use market_core::values::{FxRate, FxRateScenarioArray};
/// use market_env::view::{ScenarioMarketDataKey, ScenarioValueKey};
///
/// let pair = CurrencyPair::new(Currency::GBP, Currency::USD).unwrap();
/// let key: ScenarioValueKey<FxRate, FxRateScenarioArray> = ScenarioValueKey::new(FxRate::id(pair));
/// assert_eq!(key.market_data_id(), FxRate::id(pair));
/// ```
pub struct ScenarioValueKey<T, A> {
    id: MarketDataId<T>,
    marker: PhantomData<fn() -> A>,
}

impl<T, A> ScenarioValueKey<T, A> {
    /// Key for the aggregate of the value stored under `id`.
    pub fn new(id: MarketDataId<T>) -> Self {
        Self {
            id,
            marker: PhantomData,
        }
    }
}

impl<T, A> Clone for ScenarioValueKey<T, A> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<T, A> std::fmt::Debug for ScenarioValueKey<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioValueKey").field("id", &self.id).finish()
    }
}

impl<T, A> ScenarioMarketDataKey for ScenarioValueKey<T, A>
where
    T: MarketDataValue,
    A: FromScenarioBox<T>,
{
    type Value = T;
    type Aggregate = A;

    fn market_data_id(&self) -> MarketDataId<T> {
        self.id.clone()
    }
}

/// Market data as seen by a calculation function.
pub trait CalculationMarketData {
    /// The valuation date of each scenario.
    fn valuation_date(&self) -> MarketDataResult<&ScenarioBox<Date>>;

    /// Number of scenarios.
    fn scenario_count(&self) -> usize;

    /// The box stored under `id`.
    fn value<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> MarketDataResult<&ScenarioBox<T>>;

    /// The history of `id`; empty if none is available.
    fn time_series(&self, id: &ObservableId) -> &DateSeries;

    /// The per-scenario aggregate for `key`.
    ///
    /// A multi-scenario value already held as the requested aggregate type is
    /// returned as is. Otherwise the aggregate is built from the stored box,
    /// repeating a single value once per scenario.
    ///
    /// # Errors
    ///
    /// - `KeyNotFound` if no value is stored for the key
    /// - `ScenarioCountConflict` if a multi-scenario value has another count
    fn scenario_value<K: ScenarioMarketDataKey>(&self, key: &K) -> MarketDataResult<Arc<K::Aggregate>> {
        let boxed = self.value(&key.market_data_id())?;
        if let Some(array) = boxed.scenario_array() {
            if let Ok(aggregate) = AsAny::into_any_arc(Arc::clone(array)).downcast::<K::Aggregate>() {
                return Ok(aggregate);
            }
        }
        K::Aggregate::from_box(boxed, self.scenario_count()).map(Arc::new)
    }
}

/// [`CalculationMarketData`] backed by a [`MarketDataStore`].
///
/// # Examples
///
/// ```
/// use market_core::ids::MarketDataId;
/// use market_core::scenario::{ScenarioBox, ScenarioValues};
/// use market_env::builder::MarketDataStoreBuilder;
/// use market_env::view::{CalculationMarketData, CalculationMarketDataView, ScenarioValueKey};
///
/// let id: MarketDataId<f64> = MarketDataId::named("spot");
/// let mut builder = MarketDataStoreBuilder::new();
/// builder.add_value(&id, 100.0);
/// builder
///     .add_boxed_value(&MarketDataId::<f64>::named("vol"), ScenarioBox::of_multi(vec![0.2, 0.25]).unwrap())
///     .unwrap();
/// let store = builder.build();
///
/// let view = CalculationMarketDataView::new(&store);
/// let key: ScenarioValueKey<f64, ScenarioValues<f64>> = ScenarioValueKey::new(id);
/// let spots = view.scenario_value(&key).unwrap();
/// assert_eq!(spots.as_slice(), &[100.0, 100.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CalculationMarketDataView<'a> {
    store: &'a MarketDataStore,
}

impl<'a> CalculationMarketDataView<'a> {
    /// A view over `store`.
    pub fn new(store: &'a MarketDataStore) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &'a MarketDataStore {
        self.store
    }
}

impl CalculationMarketData for CalculationMarketDataView<'_> {
    fn valuation_date(&self) -> MarketDataResult<&ScenarioBox<Date>> {
        self.store.valuation_date()
    }

    fn scenario_count(&self) -> usize {
        self.store.scenario_count()
    }

    fn value<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> MarketDataResult<&ScenarioBox<T>> {
        self.store.value(id)
    }

    fn time_series(&self, id: &ObservableId) -> &DateSeries {
        self.store.time_series(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MarketDataStoreBuilder;
    use market_core::error::MarketDataError;
    use market_core::scenario::{ScenarioArray, ScenarioValues};
    use market_core::types::{Currency, CurrencyPair};
    use market_core::values::{FxRate, FxRateScenarioArray};

    fn eur_usd() -> CurrencyPair {
        CurrencyPair::new(Currency::EUR, Currency::USD).unwrap()
    }

    fn fx_key() -> ScenarioValueKey<FxRate, FxRateScenarioArray> {
        ScenarioValueKey::new(FxRate::id(eur_usd()))
    }

    #[test]
    fn test_aggregate_from_single() {
        let mut builder = MarketDataStoreBuilder::new();
        builder
            .add_value(&FxRate::id(eur_usd()), FxRate::new(eur_usd(), 1.1).unwrap())
            .add_boxed_value(&MarketDataId::<f64>::named("n"), ScenarioBox::of_multi(vec![0.0; 3]).unwrap())
            .unwrap();
        let store = builder.build();

        let rates = CalculationMarketDataView::new(&store).scenario_value(&fx_key()).unwrap();
        assert_eq!(rates.scenario_count(), 3);
        assert!((0..3).all(|i| rates.rate(i) == Some(1.1)));
    }

    #[test]
    fn test_aggregate_short_circuit_shares_instance() {
        let array = FxRateScenarioArray::new(eur_usd(), &[1.1, 1.2]).unwrap();
        let mut builder = MarketDataStoreBuilder::new();
        builder
            .add_boxed_value(&FxRate::id(eur_usd()), ScenarioBox::of_array(array).unwrap())
            .unwrap();
        let store = builder.build();
        let view = CalculationMarketDataView::new(&store);

        let first = view.scenario_value(&fx_key()).unwrap();
        let second = view.scenario_value(&fx_key()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.rate(1), Some(1.2));
    }

    #[test]
    fn test_aggregate_rebuilt_from_other_representation() {
        let pair = eur_usd();
        let rates = vec![FxRate::new(pair, 1.1).unwrap(), FxRate::new(pair, 1.3).unwrap()];
        let mut builder = MarketDataStoreBuilder::new();
        builder
            .add_boxed_value(&FxRate::id(pair), ScenarioBox::of_multi(rates).unwrap())
            .unwrap();
        let store = builder.build();

        let array = CalculationMarketDataView::new(&store).scenario_value(&fx_key()).unwrap();
        assert_eq!(array.pair(), pair);
        assert_eq!(array.rate(1), Some(1.3));
    }

    #[test]
    fn test_plain_values_aggregate() {
        let id: MarketDataId<f64> = MarketDataId::named("x");
        let store = MarketDataStoreBuilder::new().add_value(&id, 2.0).build();
        let key: ScenarioValueKey<f64, ScenarioValues<f64>> = ScenarioValueKey::new(id);
        let values = CalculationMarketDataView::new(&store).scenario_value(&key).unwrap();
        assert_eq!(values.as_slice(), &[2.0]);
    }

    #[test]
    fn test_missing_key() {
        let store = MarketDataStore::empty();
        let view = CalculationMarketDataView::new(&store);
        assert!(matches!(
            view.scenario_value(&fx_key()),
            Err(MarketDataError::KeyNotFound { .. })
        ));
        assert!(matches!(
            view.valuation_date(),
            Err(MarketDataError::EmptyValuationDate)
        ));
    }

    #[test]
    fn test_view_delegates_to_store() {
        let id: MarketDataId<f64> = MarketDataId::named("x");
        let store = MarketDataStoreBuilder::new().add_value(&id, 2.0).build();
        let view = CalculationMarketDataView::new(&store);
        assert_eq!(view.value(&id).unwrap(), store.value(&id).unwrap());
        assert_eq!(view.scenario_count(), store.scenario_count());
        assert!(std::ptr::eq(view.store(), &store));
    }
}
