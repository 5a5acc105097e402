//! Type-erased market data values and boxes.
//!
//! Feeds and snapshot loaders deliver values whose types are only known at
//! runtime. [`RawValue`] and [`ErasedBox`] carry such values together with
//! their [`MarketDataType`] so the builder can check them against the type
//! declared by an [`AnyMarketDataId`](market_core::ids::AnyMarketDataId)
//! before storing them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use market_core::ids::{MarketDataType, MarketDataValue};
use market_core::scenario::ScenarioBox;

/// Object-safe view of a value of any market data type.
trait AnyValue: fmt::Debug + Send + Sync {
    fn raw_type(&self) -> MarketDataType;

    fn box_single(self: Box<Self>) -> ErasedBox;
}

// Method names differ from `AnyScenarioBox` so the blanket impl, which also
// covers `Arc<dyn AnyScenarioBox>`, never shadows the boxed value's methods.
impl<T: MarketDataValue> AnyValue for T {
    fn raw_type(&self) -> MarketDataType {
        MarketDataType::of::<T>()
    }

    fn box_single(self: Box<Self>) -> ErasedBox {
        ErasedBox::new(ScenarioBox::of_single(*self))
    }
}

/// A single market data value whose type is known only at runtime.
///
/// ```
/// use market_env::erased::RawValue;
///
/// let raw = RawValue::new(1.25_f64);
/// assert!(raw.value_type().is::<f64>());
/// ```
#[derive(Debug)]
pub struct RawValue(Box<dyn AnyValue>);

impl RawValue {
    /// Wraps `value`.
    pub fn new<T: MarketDataValue>(value: T) -> Self {
        RawValue(Box::new(value))
    }

    /// Runtime type of the value.
    pub fn value_type(&self) -> MarketDataType {
        AnyValue::raw_type(&*self.0)
    }

    /// Wraps the value in a single-value box.
    pub fn into_single_box(self) -> ErasedBox {
        AnyValue::box_single(self.0)
    }
}

/// Object-safe view of a `ScenarioBox<T>` of any `T`.
trait AnyScenarioBox: fmt::Debug + Send + Sync {
    fn value_type(&self) -> MarketDataType;

    fn scenario_count(&self) -> usize;

    fn is_single(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

impl<T: MarketDataValue> AnyScenarioBox for ScenarioBox<T> {
    fn value_type(&self) -> MarketDataType {
        MarketDataType::of::<T>()
    }

    fn scenario_count(&self) -> usize {
        ScenarioBox::scenario_count(self)
    }

    fn is_single(&self) -> bool {
        ScenarioBox::is_single(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A scenario box whose value type is known only at runtime.
///
/// Cloning shares the underlying box.
///
/// ```
/// use market_core::scenario::ScenarioBox;
/// use market_env::erased::ErasedBox;
///
/// let erased = ErasedBox::new(ScenarioBox::of_multi(vec![1_i64, 2, 3]).unwrap());
/// assert_eq!(erased.scenario_count(), 3);
/// assert!(erased.downcast_ref::<i64>().is_some());
/// assert!(erased.downcast_ref::<f64>().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ErasedBox(Arc<dyn AnyScenarioBox>);

impl ErasedBox {
    /// Erases the value type of `boxed`.
    pub fn new<T: MarketDataValue>(boxed: ScenarioBox<T>) -> Self {
        ErasedBox(Arc::new(boxed))
    }

    /// Runtime type of the boxed value(s).
    pub fn value_type(&self) -> MarketDataType {
        AnyScenarioBox::value_type(&*self.0)
    }

    /// Scenario count of the box; 1 for a single value.
    pub fn scenario_count(&self) -> usize {
        AnyScenarioBox::scenario_count(&*self.0)
    }

    /// True if the box holds a single value.
    pub fn is_single(&self) -> bool {
        AnyScenarioBox::is_single(&*self.0)
    }

    /// The box as `ScenarioBox<T>`, if `T` is its value type.
    pub fn downcast_ref<T: MarketDataValue>(&self) -> Option<&ScenarioBox<T>> {
        AnyScenarioBox::as_any(&*self.0).downcast_ref::<ScenarioBox<T>>()
    }

    /// True if both handles share the same box.
    pub fn ptr_eq(&self, other: &ErasedBox) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: MarketDataValue> From<ScenarioBox<T>> for ErasedBox {
    fn from(boxed: ScenarioBox<T>) -> Self {
        ErasedBox::new(boxed)
    }
}
