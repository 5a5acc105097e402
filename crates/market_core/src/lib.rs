//! # market_core: Market Data Foundation
//!
//! ## Layer 1 (Foundation) Role
//!
//! market_core is the bottom layer of the market data workspace, providing:
//! - Date, day count and currency types (`types`)
//! - Date-indexed observation histories (`timeseries`)
//! - Typed and type-erased market data identifiers (`ids`)
//! - Single or per-scenario value boxes (`scenario`)
//! - Concrete value types read by calculation functions (`values`)
//! - The market data error taxonomy (`error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates, with minimal
//! external dependencies:
//! - chrono: Date arithmetic
//! - thiserror: Error types
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use market_core::scenario::ScenarioBox;
//! use market_core::types::{Currency, CurrencyPair};
//! use market_core::values::FxRate;
//!
//! let pair = CurrencyPair::new(Currency::EUR, Currency::USD).unwrap();
//! let id = FxRate::id(pair);
//! assert_eq!(id.to_string(), "FxRate(EUR/USD)");
//!
//! let rates = ScenarioBox::of_multi(vec![
//!     FxRate::new(pair, 1.10).unwrap(),
//!     FxRate::new(pair, 1.12).unwrap(),
//! ])
//! .unwrap();
//! assert_eq!(rates.scenario_count(), 2);
//! assert!(rates.value_type().is::<FxRate>());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for Date, Currency, CurrencyPair
//!   and DateSeries

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod ids;
pub mod scenario;
pub mod timeseries;
pub mod types;
pub mod values;

pub use error::{MarketDataError, MarketDataResult};
pub use ids::{AnyMarketDataId, MarketDataId, MarketDataKey, MarketDataType, ObservableId};
pub use scenario::ScenarioBox;
pub use timeseries::DateSeries;
