//! End-to-end assembly of a three-scenario market data set.
//!
//! Valuation dates and FX rates vary by scenario while the discount curve is
//! shared; a calculation reads everything back through the view.

use market_core::error::MarketDataError;
use market_core::ids::{AnyMarketDataId, MarketDataId};
use market_core::scenario::ScenarioBox;
use market_core::types::{Currency, CurrencyPair, Date, DayCountConvention};
use market_core::values::{DiscountFactors, FxRate, FxRateScenarioArray};
use market_env::builder::MarketDataStoreBuilder;
use market_env::erased::{ErasedBox, RawValue};
use market_env::view::{CalculationMarketData, CalculationMarketDataView, ScenarioValueKey};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn date(day: u32) -> Date {
    Date::from_ymd(2024, 6, day).unwrap()
}

fn eur_usd() -> CurrencyPair {
    CurrencyPair::new(Currency::EUR, Currency::USD).unwrap()
}

fn fx(rate: f64) -> FxRate {
    FxRate::new(eur_usd(), rate).unwrap()
}

/// Three valuation dates, one curve and three FX rates give three scenarios.
#[test]
fn test_three_scenario_market() {
    init_tracing();
    let curve = DiscountFactors::new(Currency::USD, date(3), 0.05, DayCountConvention::ActualActual365);

    let mut builder = MarketDataStoreBuilder::new();
    builder
        .valuation_date_box(ScenarioBox::of_multi(vec![date(3), date(4), date(5)]).unwrap())
        .unwrap();
    builder.add_value(&DiscountFactors::id(Currency::USD), curve);
    builder
        .add_boxed_values([(
            AnyMarketDataId::from(FxRate::id(eur_usd())),
            ErasedBox::new(ScenarioBox::of_multi(vec![fx(1.07), fx(1.08), fx(1.09)]).unwrap()),
        )])
        .unwrap();
    let store = builder.build();

    assert_eq!(store.scenario_count(), 3);

    let view = CalculationMarketDataView::new(&store);
    let curves = view.value(&DiscountFactors::id(Currency::USD)).unwrap();
    for i in 0..3 {
        assert_eq!(curves.get(i).unwrap(), &curve);
    }

    let rates = view.value(&FxRate::id(eur_usd())).unwrap();
    assert_eq!(rates.get(1).unwrap().rate(), 1.08);
    assert_eq!(view.valuation_date().unwrap().get(2).unwrap(), &date(5));

    // Derived aggregate matches the stored per-scenario rates
    let key: ScenarioValueKey<FxRate, FxRateScenarioArray> = ScenarioValueKey::new(FxRate::id(eur_usd()));
    let array = view.scenario_value(&key).unwrap();
    assert_eq!(array.convert(100.0, Currency::EUR).map(|v| v.len()), Some(3));
}

/// A raw value of the wrong type is rejected and the builder is unchanged.
#[test]
fn test_raw_value_type_mismatch() {
    init_tracing();
    let id: MarketDataId<FxRate> = FxRate::id(eur_usd());
    let mut builder = MarketDataStoreBuilder::new();
    builder.add_value(&id, fx(1.1));

    let result = builder.add_values([(id.erase(), RawValue::new(1.2_f64))]);
    assert!(matches!(result, Err(MarketDataError::TypeMismatch { .. })));

    let store = builder.build();
    assert_eq!(store.value(&id).unwrap().get(0).unwrap().rate(), 1.1);
}

/// A store built before later additions keeps its scenario count and values.
#[test]
fn test_store_snapshot_isolation() {
    let spot: MarketDataId<f64> = MarketDataId::named("spot");
    let mut builder = MarketDataStoreBuilder::new();
    builder.add_value(&spot, 1.0);
    let before = builder.build();

    builder
        .add_boxed_value(&spot, ScenarioBox::of_multi(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap())
        .unwrap();
    let after = builder.build();

    assert_eq!(before.scenario_count(), 1);
    assert!(before.value(&spot).unwrap().is_single());
    assert_eq!(after.scenario_count(), 5);
    assert_eq!(after.value(&spot).unwrap().scenario_count(), 5);
}

/// Missing data surfaces as `KeyNotFound` or an empty history.
#[test]
fn test_missing_data() {
    let store = MarketDataStoreBuilder::new().build();
    let view = CalculationMarketDataView::new(&store);

    assert!(matches!(
        view.value(&FxRate::id(eur_usd())),
        Err(MarketDataError::KeyNotFound { .. })
    ));
    let obs = market_core::ids::ObservableId::new(market_core::ids::StandardId::of("OG-Ticker", "EURUSD").unwrap());
    assert!(view.time_series(&obs).is_empty());
}
