//! Typed market data identifiers.
//!
//! This module provides:
//! - [`MarketDataType`]: a reified runtime type descriptor
//! - [`MarketDataKey`]: the key data naming an item of market data
//! - [`MarketDataId`]: a key tied at compile time to its value type
//! - [`AnyMarketDataId`]: a key carrying its value type at runtime, used in
//!   heterogeneous maps
//! - [`ObservableId`]: identifiers of vendor-sourced quotes, the only
//!   identifiers eligible for time series
//!
//! Two identifiers are equal iff their key data and their declared value type
//! are equal, so the same key may name different items of different types.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::MarketDataError;
use crate::types::{Currency, CurrencyPair};

/// Bound satisfied by every type that can be stored as market data.
///
/// Values are shared between calculation threads, hence `Send + Sync`, and
/// are rendered with `Debug` in error messages.
pub trait MarketDataValue: Any + fmt::Debug + Send + Sync {}

impl<T: Any + fmt::Debug + Send + Sync> MarketDataValue for T {}

/// Runtime type descriptor of a market data value.
///
/// Equality and hashing use the `TypeId` only; the name is kept for
/// diagnostics.
///
/// ```
/// use market_core::ids::MarketDataType;
///
/// assert_eq!(MarketDataType::of::<f64>(), MarketDataType::of::<f64>());
/// assert_ne!(MarketDataType::of::<f64>(), MarketDataType::of::<f32>());
/// assert_eq!(MarketDataType::of::<f64>().name(), "f64");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MarketDataType {
    id: TypeId,
    name: &'static str,
}

impl MarketDataType {
    /// Descriptor of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Full type name, as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if this descriptor describes `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for MarketDataType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MarketDataType {}

impl Hash for MarketDataType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for MarketDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ========================================
// Observable identifiers
// ========================================

/// A `scheme~value` identifier, e.g. `OG-Ticker~EUR/USD`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardId {
    scheme: String,
    value: String,
}

impl StandardId {
    /// Creates a standard identifier.
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError::NullArgument` if either part is blank.
    pub fn of(scheme: impl Into<String>, value: impl Into<String>) -> Result<Self, MarketDataError> {
        let scheme = scheme.into();
        let value = value.into();
        if scheme.trim().is_empty() {
            return Err(MarketDataError::null_argument("scheme"));
        }
        if value.trim().is_empty() {
            return Err(MarketDataError::null_argument("value"));
        }
        Ok(Self { scheme, value })
    }

    /// The scheme part.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The value part.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for StandardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.scheme, self.value)
    }
}

impl FromStr for StandardId {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, value) = s
            .split_once('~')
            .ok_or_else(|| MarketDataError::null_argument(format!("scheme in '{}'", s)))?;
        StandardId::of(scheme, value)
    }
}

/// Name of the field of a quote, e.g. `MarketValue` or `Bid`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldName(String);

impl FieldName {
    /// Creates a field name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The field holding the market value of an observable.
    pub fn market_value() -> Self {
        Self::new("MarketValue")
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FieldName {
    fn default() -> Self {
        Self::market_value()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Market data vendor an observable is sourced from.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketDataVendor(String);

impl MarketDataVendor {
    /// Creates a vendor.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Placeholder vendor for data with no specific source.
    pub fn none() -> Self {
        Self::new("None")
    }

    /// The vendor name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MarketDataVendor {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for MarketDataVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a vendor-sourced quote.
///
/// The standard ID and the vendor are not necessarily related; a vendor ID
/// mapping translates the ID into one the vendor understands before data is
/// requested.
///
/// ```
/// use market_core::ids::{ObservableId, StandardId, MarketDataVendor};
///
/// let id = ObservableId::new(StandardId::of("OG-Ticker", "EUR/USD").unwrap())
///     .with_vendor(MarketDataVendor::new("Bloomberg"));
/// assert_eq!(id.to_string(), "OG-Ticker~EUR/USD/MarketValue/Bloomberg");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservableId {
    standard_id: StandardId,
    field: FieldName,
    vendor: MarketDataVendor,
}

impl ObservableId {
    /// Observable of the market value field with no specific vendor.
    pub fn new(standard_id: StandardId) -> Self {
        Self {
            standard_id,
            field: FieldName::default(),
            vendor: MarketDataVendor::default(),
        }
    }

    /// Returns a copy with the field replaced.
    pub fn with_field(mut self, field: FieldName) -> Self {
        self.field = field;
        self
    }

    /// Returns a copy with the vendor replaced.
    pub fn with_vendor(mut self, vendor: MarketDataVendor) -> Self {
        self.vendor = vendor;
        self
    }

    /// Returns a copy with the standard ID replaced.
    pub fn with_standard_id(mut self, standard_id: StandardId) -> Self {
        self.standard_id = standard_id;
        self
    }

    /// The standard ID.
    pub fn standard_id(&self) -> &StandardId {
        &self.standard_id
    }

    /// The field name.
    pub fn field(&self) -> &FieldName {
        &self.field
    }

    /// The vendor.
    pub fn vendor(&self) -> &MarketDataVendor {
        &self.vendor
    }

    /// Typed identifier of this observable's current value.
    pub fn to_market_data_id(&self) -> MarketDataId<f64> {
        MarketDataId::new(MarketDataKey::Observable(self.clone()))
    }
}

impl fmt::Display for ObservableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.standard_id, self.field, self.vendor)
    }
}

// ========================================
// Market data keys and identifiers
// ========================================

/// Key data naming an item of market data.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MarketDataKey {
    /// A vendor-sourced quote.
    Observable(ObservableId),
    /// FX rate for a currency pair.
    FxRate(CurrencyPair),
    /// Discount curve of a currency.
    DiscountCurve(Currency),
    /// Any other named item.
    Named(String),
}

impl fmt::Display for MarketDataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketDataKey::Observable(id) => write!(f, "Observable({})", id),
            MarketDataKey::FxRate(pair) => write!(f, "FxRate({})", pair),
            MarketDataKey::DiscountCurve(ccy) => write!(f, "DiscountCurve({})", ccy),
            MarketDataKey::Named(name) => write!(f, "Named({})", name),
        }
    }
}

/// Identifier of an item of market data of type `T`.
///
/// ```
/// use market_core::ids::{MarketDataId, MarketDataKey};
///
/// let id: MarketDataId<f64> = MarketDataId::named("USD-SOFR-fixing");
/// assert_eq!(id.key(), &MarketDataKey::Named("USD-SOFR-fixing".to_string()));
/// assert_eq!(id.to_string(), "Named(USD-SOFR-fixing)");
/// ```
pub struct MarketDataId<T> {
    key: MarketDataKey,
    marker: PhantomData<fn() -> T>,
}

impl<T> MarketDataId<T> {
    /// Identifier of `T` named by `key`.
    pub fn new(key: MarketDataKey) -> Self {
        Self {
            key,
            marker: PhantomData,
        }
    }

    /// Identifier of `T` with a free-form name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(MarketDataKey::Named(name.into()))
    }

    /// The key data.
    pub fn key(&self) -> &MarketDataKey {
        &self.key
    }

    /// The observable ID if this identifies a quote.
    pub fn as_observable(&self) -> Option<&ObservableId> {
        match &self.key {
            MarketDataKey::Observable(id) => Some(id),
            _ => None,
        }
    }
}

impl<T: 'static> MarketDataId<T> {
    /// Declared value type.
    pub fn value_type(&self) -> MarketDataType {
        MarketDataType::of::<T>()
    }

    /// Type-erased form, carrying the declared type at runtime.
    pub fn erase(&self) -> AnyMarketDataId {
        AnyMarketDataId::new(self.key.clone(), self.value_type())
    }
}

impl<T> Clone for MarketDataId<T> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

impl<T> PartialEq for MarketDataId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for MarketDataId<T> {}

impl<T> Hash for MarketDataId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for MarketDataId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketDataId")
            .field("key", &self.key)
            .field("type", &type_name::<T>())
            .finish()
    }
}

impl<T> fmt::Display for MarketDataId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

impl From<ObservableId> for MarketDataId<f64> {
    fn from(id: ObservableId) -> Self {
        MarketDataId::new(MarketDataKey::Observable(id))
    }
}

/// Identifier carrying its declared value type at runtime.
///
/// Used where identifiers of different value types travel together, e.g.
/// a batch of raw values arriving from a feed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnyMarketDataId {
    key: MarketDataKey,
    value_type: MarketDataType,
}

impl AnyMarketDataId {
    /// Identifier of `key` declared as `value_type`.
    pub fn new(key: MarketDataKey, value_type: MarketDataType) -> Self {
        Self { key, value_type }
    }

    /// The key data.
    pub fn key(&self) -> &MarketDataKey {
        &self.key
    }

    /// Declared value type.
    pub fn value_type(&self) -> MarketDataType {
        self.value_type
    }

    /// Typed form, if the declared type is `T`.
    pub fn typed<T: 'static>(&self) -> Option<MarketDataId<T>> {
        self.value_type
            .is::<T>()
            .then(|| MarketDataId::new(self.key.clone()))
    }
}

impl fmt::Display for AnyMarketDataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

impl<T: 'static> From<MarketDataId<T>> for AnyMarketDataId {
    fn from(id: MarketDataId<T>) -> Self {
        AnyMarketDataId::new(id.key, MarketDataType::of::<T>())
    }
}

impl<T: 'static> From<&MarketDataId<T>> for AnyMarketDataId {
    fn from(id: &MarketDataId<T>) -> Self {
        id.erase()
    }
}
