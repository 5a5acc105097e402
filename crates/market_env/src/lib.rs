//! # market_env: Scenario-Aware Market Data Environment
//!
//! ## Layer 2 Role
//!
//! market_env assembles market data for a calculation run and exposes it to
//! calculation functions:
//! - Validated incremental assembly (`builder`)
//! - Immutable, thread-safe snapshots (`store`)
//! - Type-erased values and boxes for runtime-typed inputs (`erased`)
//! - Calculation-facing read access and scenario aggregates (`view`)
//! - Vendor identifier translation (`mapping`)
//! - Loading observables from a provider (`feed`)
//! - TOML market data snapshots (`config`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use market_core::scenario::ScenarioBox;
//! use market_core::types::{Currency, CurrencyPair, Date};
//! use market_core::values::{FxRate, FxRateScenarioArray};
//! use market_env::builder::MarketDataStoreBuilder;
//! use market_env::view::{CalculationMarketData, CalculationMarketDataView, ScenarioValueKey};
//!
//! let pair = CurrencyPair::new(Currency::EUR, Currency::USD).unwrap();
//! let rates = FxRateScenarioArray::new(pair, &[1.08, 1.09, 1.10]).unwrap();
//!
//! let mut builder = MarketDataStoreBuilder::new();
//! builder.valuation_date(Date::from_ymd(2024, 3, 1).unwrap());
//! builder
//!     .add_boxed_value(&FxRate::id(pair), ScenarioBox::of_array(rates).unwrap())
//!     .unwrap();
//! let store = builder.build();
//!
//! let view = CalculationMarketDataView::new(&store);
//! let key: ScenarioValueKey<FxRate, FxRateScenarioArray> = ScenarioValueKey::new(FxRate::id(pair));
//! let fx = view.scenario_value(&key).unwrap();
//! assert_eq!(view.scenario_count(), 3);
//! assert_eq!(fx.rate(1), Some(1.09));
//! ```
//!
//! ## Logging
//!
//! Events are emitted through `tracing`; no subscriber is installed by this
//! crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod builder;
pub mod config;
pub mod erased;
pub mod feed;
pub mod mapping;
pub mod store;
pub mod view;

pub use builder::MarketDataStoreBuilder;
pub use config::{ConfigError, MarketDataSnapshot};
pub use erased::{ErasedBox, RawValue};
pub use mapping::{IdentityMapping, VendorIdMapping};
pub use store::MarketDataStore;
pub use view::{CalculationMarketData, CalculationMarketDataView, ScenarioMarketDataKey, ScenarioValueKey};
