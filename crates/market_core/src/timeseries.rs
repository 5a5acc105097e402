//! Date-indexed time series of observable market data.
//!
//! Time series are independent of scenarios: a single history per observable
//! identifier is shared by every scenario of a calculation run.

use std::collections::BTreeMap;

use crate::types::Date;

/// A series of `f64` observations keyed by date, kept in date order.
///
/// An empty series is a valid value meaning "no history available".
///
/// # Examples
///
/// ```
/// use market_core::timeseries::DateSeries;
/// use market_core::types::Date;
///
/// let d1 = Date::from_ymd(2024, 1, 2).unwrap();
/// let d2 = Date::from_ymd(2024, 1, 3).unwrap();
/// let series = DateSeries::from_points([(d2, 1.2), (d1, 1.1)]);
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.earliest(), Some((d1, 1.1)));
/// assert_eq!(series.get(d2), Some(1.2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DateSeries {
    points: BTreeMap<Date, f64>,
}

impl DateSeries {
    /// Creates an empty series; usable in `const` and `static` items.
    pub const fn new() -> Self {
        Self {
            points: BTreeMap::new(),
        }
    }

    /// Creates an empty series.
    pub fn empty() -> Self {
        Self::new()
    }

    /// Creates a series from `(date, value)` points.
    ///
    /// Points may arrive in any order; a later point for a date already seen
    /// replaces the earlier one.
    pub fn from_points(points: impl IntoIterator<Item = (Date, f64)>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the series has no observations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observation on `date`, if any.
    pub fn get(&self, date: Date) -> Option<f64> {
        self.points.get(&date).copied()
    }

    /// True if an observation exists on `date`.
    pub fn contains_date(&self, date: Date) -> bool {
        self.points.contains_key(&date)
    }

    /// First observation in date order.
    pub fn earliest(&self) -> Option<(Date, f64)> {
        self.points.iter().next().map(|(d, v)| (*d, *v))
    }

    /// Last observation in date order.
    pub fn latest(&self) -> Option<(Date, f64)> {
        self.points.iter().next_back().map(|(d, v)| (*d, *v))
    }

    /// Most recent observation on or before `date`.
    ///
    /// Fixing lookups use this when the exact fixing date is a holiday.
    pub fn latest_on_or_before(&self, date: Date) -> Option<(Date, f64)> {
        self.points.range(..=date).next_back().map(|(d, v)| (*d, *v))
    }

    /// Observations with `start <= date <= end`.
    pub fn sub_series(&self, start: Date, end: Date) -> Self {
        if start > end {
            return Self::empty();
        }
        Self {
            points: self
                .points
                .range(start..=end)
                .map(|(d, v)| (*d, *v))
                .collect(),
        }
    }

    /// Iterates over `(date, value)` in date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.points.iter().map(|(d, v)| (*d, *v))
    }

    /// Dates in order.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.points.keys().copied()
    }

    /// Values in date order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.values().copied()
    }
}

impl FromIterator<(Date, f64)> for DateSeries {
    fn from_iter<I: IntoIterator<Item = (Date, f64)>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}
