//! Scenario boxes: one shared value or one value per scenario.
//!
//! This module provides:
//! - [`ScenarioBox`]: either a single value used by every scenario or a
//!   multi-scenario aggregate holding one value per scenario
//! - [`ScenarioArray`]: the capability of an aggregate holding per-scenario
//!   values; domain aggregates such as
//!   [`FxRateScenarioArray`](crate::values::FxRateScenarioArray) implement it
//! - [`ScenarioValues`]: the plain vector aggregate used by
//!   [`ScenarioBox::of_multi`]
//! - [`FromScenarioBox`]: construction of an aggregate from any box
//!
//! # Example
//!
//! ```
//! use market_core::scenario::ScenarioBox;
//!
//! let shared = ScenarioBox::of_single(1.10_f64);
//! assert!(shared.is_single());
//! assert_eq!(*shared.get(7).unwrap(), 1.10);
//!
//! let bumped = ScenarioBox::of_multi(vec![1.10_f64, 1.11, 1.12]).unwrap();
//! assert_eq!(bumped.scenario_count(), 3);
//! assert_eq!(*bumped.get(1).unwrap(), 1.11);
//! assert!(bumped.get(3).is_err());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::MarketDataError;
use crate::ids::{MarketDataType, MarketDataValue};

/// Access to a value as `Any`, including through an `Arc`.
///
/// Implemented for every sized `'static + Send + Sync` type; used to recover
/// the concrete aggregate type behind a `dyn ScenarioArray`.
pub trait AsAny: Any + Send + Sync {
    /// Borrow as `Any`.
    fn as_any(&self) -> &dyn Any;

    /// Convert a shared pointer into a shared `Any`.
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<A: Any + Send + Sync> AsAny for A {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// An aggregate holding one value of type `T` per scenario.
pub trait ScenarioArray<T>: AsAny + fmt::Debug {
    /// Number of scenarios.
    fn scenario_count(&self) -> usize;

    /// Value for `scenario`, or `None` if out of range.
    fn value(&self, scenario: usize) -> Option<&T>;
}

/// Construction of an aggregate from a box.
///
/// A `Single` box is expanded to `scenario_count` copies of its value; a
/// `Multi` box must already hold exactly `scenario_count` values.
pub trait FromScenarioBox<T>: ScenarioArray<T> + Sized {
    /// Builds the aggregate.
    ///
    /// # Errors
    ///
    /// - `InvalidCardinality` if `scenario_count` is zero
    /// - `ScenarioCountConflict` if a `Multi` box has a different count
    fn from_box(source: &ScenarioBox<T>, scenario_count: usize) -> Result<Self, MarketDataError>;
}

/// Per-scenario values held in a vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioValues<T>(Vec<T>);

impl<T> ScenarioValues<T> {
    /// Wraps `values`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCardinality` if `values` is empty.
    pub fn new(values: Vec<T>) -> Result<Self, MarketDataError> {
        if values.is_empty() {
            return Err(MarketDataError::InvalidCardinality { count: 0 });
        }
        Ok(Self(values))
    }

    /// The values as a slice, index i holding scenario i.
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: MarketDataValue> ScenarioArray<T> for ScenarioValues<T> {
    fn scenario_count(&self) -> usize {
        self.0.len()
    }

    fn value(&self, scenario: usize) -> Option<&T> {
        self.0.get(scenario)
    }
}

impl<T: MarketDataValue + Clone> FromScenarioBox<T> for ScenarioValues<T> {
    fn from_box(source: &ScenarioBox<T>, scenario_count: usize) -> Result<Self, MarketDataError> {
        ScenarioValues::new(source.iter(scenario_count)?.cloned().collect())
    }
}

/// A market data value shared by all scenarios, or one value per scenario.
///
/// `Single` places no constraint on the number of scenarios. `Multi` holds at
/// least one value; a one-element `Multi` is a distinct representation from
/// `Single` and is never merged into it.
///
/// The per-scenario aggregate is shared through `Arc`, so cloning a box never
/// copies its values.
#[derive(Clone, Debug)]
pub enum ScenarioBox<T: 'static> {
    /// One value used in every scenario.
    Single(T),
    /// One value per scenario.
    Multi(Arc<dyn ScenarioArray<T>>),
}

impl<T> ScenarioBox<T> {
    /// A box holding one value for all scenarios.
    pub fn of_single(value: T) -> Self {
        ScenarioBox::Single(value)
    }

    /// True if the box holds a single value.
    #[inline]
    pub fn is_single(&self) -> bool {
        matches!(self, ScenarioBox::Single(_))
    }

    /// Number of scenarios; 1 for a single value.
    pub fn scenario_count(&self) -> usize {
        match self {
            ScenarioBox::Single(_) => 1,
            ScenarioBox::Multi(values) => values.scenario_count(),
        }
    }

    /// Value for `scenario`.
    ///
    /// A single value is returned for every index.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if a multi-scenario box has no value at
    /// `scenario`.
    pub fn get(&self, scenario: usize) -> Result<&T, MarketDataError> {
        match self {
            ScenarioBox::Single(value) => Ok(value),
            ScenarioBox::Multi(values) => {
                values
                    .value(scenario)
                    .ok_or(MarketDataError::IndexOutOfRange {
                        index: scenario,
                        count: values.scenario_count(),
                    })
            }
        }
    }

    /// The single value, if this is a single-value box.
    pub fn single_value(&self) -> Option<&T> {
        match self {
            ScenarioBox::Single(value) => Some(value),
            ScenarioBox::Multi(_) => None,
        }
    }

    /// The per-scenario aggregate, if this is a multi-scenario box.
    pub fn scenario_array(&self) -> Option<&Arc<dyn ScenarioArray<T>>> {
        match self {
            ScenarioBox::Single(_) => None,
            ScenarioBox::Multi(values) => Some(values),
        }
    }

    /// One value per scenario for a run of `scenario_count` scenarios.
    ///
    /// # Errors
    ///
    /// - `InvalidCardinality` if `scenario_count` is zero
    /// - `ScenarioCountConflict` if a multi-scenario box has another count
    pub fn iter(
        &self,
        scenario_count: usize,
    ) -> Result<impl Iterator<Item = &T> + '_, MarketDataError> {
        if scenario_count == 0 {
            return Err(MarketDataError::InvalidCardinality { count: 0 });
        }
        if let ScenarioBox::Multi(values) = self {
            if values.scenario_count() != scenario_count {
                return Err(MarketDataError::ScenarioCountConflict {
                    value: format!("{:?}", values),
                    count: values.scenario_count(),
                    expected: scenario_count,
                });
            }
        }
        Ok((0..scenario_count).filter_map(move |i| self.get(i).ok()))
    }
}

impl<T: MarketDataValue> ScenarioBox<T> {
    /// A box holding one value per scenario, index i holding scenario i.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCardinality` if `values` is empty.
    pub fn of_multi(values: Vec<T>) -> Result<Self, MarketDataError> {
        Ok(ScenarioBox::Multi(Arc::new(ScenarioValues::new(values)?)))
    }

    /// A box wrapping a domain aggregate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCardinality` if the aggregate holds no scenarios.
    pub fn of_array<A: ScenarioArray<T>>(values: A) -> Result<Self, MarketDataError> {
        let count = values.scenario_count();
        if count == 0 {
            return Err(MarketDataError::InvalidCardinality { count });
        }
        Ok(ScenarioBox::Multi(Arc::new(values)))
    }

    /// Runtime type of the boxed value(s).
    pub fn value_type(&self) -> MarketDataType {
        MarketDataType::of::<T>()
    }

    /// A box of the same shape with `f` applied to every value.
    ///
    /// ```
    /// use market_core::scenario::ScenarioBox;
    ///
    /// let rates = ScenarioBox::of_multi(vec![0.01_f64, 0.02]).unwrap();
    /// let bps = rates.map(|r| r * 10_000.0);
    /// assert_eq!(*bps.get(1).unwrap(), 200.0);
    /// ```
    pub fn map<U, F>(&self, f: F) -> ScenarioBox<U>
    where
        U: MarketDataValue,
        F: Fn(&T) -> U,
    {
        match self {
            ScenarioBox::Single(value) => ScenarioBox::Single(f(value)),
            ScenarioBox::Multi(values) => {
                let mapped = (0..values.scenario_count())
                    .filter_map(|i| values.value(i))
                    .map(&f)
                    .collect();
                ScenarioBox::Multi(Arc::new(ScenarioValues(mapped)))
            }
        }
    }
}

impl<T: PartialEq> PartialEq for ScenarioBox<T> {
    /// Structural equality; the aggregate type of a multi-scenario box is not
    /// compared, only its values.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScenarioBox::Single(a), ScenarioBox::Single(b)) => a == b,
            (ScenarioBox::Multi(a), ScenarioBox::Multi(b)) => {
                a.scenario_count() == b.scenario_count()
                    && (0..a.scenario_count()).all(|i| a.value(i) == b.value(i))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_of_multi_empty_rejected() {
        let result = ScenarioBox::<f64>::of_multi(vec![]);
        assert_eq!(
            result.unwrap_err(),
            MarketDataError::InvalidCardinality { count: 0 }
        );
    }

    #[test]
    fn test_of_multi_single_element_is_not_single() {
        let multi = ScenarioBox::of_multi(vec![1.5_f64]).unwrap();
        let single = ScenarioBox::of_single(1.5_f64);

        assert!(!multi.is_single());
        assert_eq!(multi.scenario_count(), 1);
        assert_eq!(single.scenario_count(), 1);
        assert_ne!(multi, single);
    }

    #[test]
    fn test_value_type() {
        let b = ScenarioBox::of_single(String::from("x"));
        assert!(b.value_type().is::<String>());
    }

    // ========================================
    // Access Tests
    // ========================================

    #[test]
    fn test_single_ignores_index() {
        let b = ScenarioBox::of_single(42_i64);
        for i in [0, 1, 100, usize::MAX] {
            assert_eq!(*b.get(i).unwrap(), 42);
        }
        assert_eq!(b.single_value(), Some(&42));
        assert!(b.scenario_array().is_none());
    }

    #[test]
    fn test_multi_index_out_of_range() {
        let b = ScenarioBox::of_multi(vec![1_i64, 2, 3]).unwrap();
        assert_eq!(
            b.get(3).unwrap_err(),
            MarketDataError::IndexOutOfRange { index: 3, count: 3 }
        );
        assert!(b.single_value().is_none());
    }

    #[test]
    fn test_iter_expands_single() {
        let b = ScenarioBox::of_single(7_i64);
        let values: Vec<i64> = b.iter(3).unwrap().copied().collect();
        assert_eq!(values, vec![7, 7, 7]);
    }

    #[test]
    fn test_iter_rejects_other_count() {
        let b = ScenarioBox::of_multi(vec![1_i64, 2]).unwrap();
        match b.iter(3) {
            Err(MarketDataError::ScenarioCountConflict { count, expected, .. }) => {
                assert_eq!(count, 2);
                assert_eq!(expected, 3);
            }
            other => panic!("Expected ScenarioCountConflict, got {:?}", other.err()),
        }
        assert!(b.iter(0).is_err());
    }

    #[test]
    fn test_scenario_values_from_box() {
        let single = ScenarioBox::of_single(2.0_f64);
        let values = ScenarioValues::from_box(&single, 4).unwrap();
        assert_eq!(values.as_slice(), &[2.0, 2.0, 2.0, 2.0]);
    }

    // ========================================
    // Equality and Map Tests
    // ========================================

    #[test]
    fn test_equality_is_structural() {
        let a = ScenarioBox::of_multi(vec![1_i64, 2]).unwrap();
        let b = ScenarioBox::of_multi(vec![1_i64, 2]).unwrap();
        let c = ScenarioBox::of_multi(vec![1_i64, 3]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(ScenarioBox::of_single(1_i64), ScenarioBox::of_single(1_i64));
    }

    #[test]
    fn test_map_keeps_shape() {
        let single = ScenarioBox::of_single(2_i64).map(|v| v * 10);
        assert!(single.is_single());

        let multi = ScenarioBox::of_multi(vec![1_i64, 2, 3]).unwrap().map(|v| v.to_string());
        assert_eq!(multi.scenario_count(), 3);
        assert_eq!(multi.get(2).unwrap(), "3");
    }

    #[test]
    fn test_clone_shares_aggregate() {
        let a = ScenarioBox::of_multi(vec![1_i64, 2]).unwrap();
        let b = a.clone();
        let (pa, pb) = (a.scenario_array().unwrap(), b.scenario_array().unwrap());
        assert!(Arc::ptr_eq(pa, pb));
    }

    // ========================================
    // Property Tests
    // ========================================

    proptest! {
        #[test]
        fn prop_multi_count_matches_input(values in proptest::collection::vec(-1e6f64..1e6, 1..50)) {
            let b = ScenarioBox::of_multi(values.clone()).unwrap();
            prop_assert_eq!(b.scenario_count(), values.len());
            for (i, v) in values.iter().enumerate() {
                prop_assert_eq!(b.get(i).unwrap(), v);
            }
            prop_assert!(b.get(values.len()).is_err());
        }

        #[test]
        fn prop_single_any_index(value in -1e6f64..1e6, index in 0usize..10_000) {
            let b = ScenarioBox::of_single(value);
            prop_assert_eq!(*b.get(index).unwrap(), value);
        }
    }
}
