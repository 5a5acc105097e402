//! Dates and day count conventions.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: Year fraction conventions used by discounting values
//!
//! # Examples
//!
//! ```
//! use market_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let end = Date::from_ymd(2024, 7, 1).unwrap();
//!
//! let yf = DayCountConvention::ActualActual365.year_fraction(start, end);
//! assert!((yf - 0.4986).abs() < 0.001);
//! ```

use chrono::{Datelike, Days, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Valuation dates, time series observation dates and discounting dates are
/// all expressed with this type.
///
/// # Examples
///
/// ```
/// use market_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let end = Date::from_ymd(2024, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidDate` when the components do not form a
    /// calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format (YYYY-MM-DD).
    ///
    /// ```
    /// use market_core::types::time::Date;
    ///
    /// assert!(Date::parse("2024-06-15").is_ok());
    /// assert!(Date::parse("15/06/2024").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("{}: {}", s, e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the date `days` calendar days later, or `None` on overflow.
    ///
    /// ```
    /// use market_core::types::time::Date;
    ///
    /// let d = Date::from_ymd(2024, 2, 28).unwrap();
    /// assert_eq!(d.plus_days(2), Some(Date::from_ymd(2024, 3, 1).unwrap()));
    /// ```
    pub fn plus_days(self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Date)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day count convention (year fraction convention).
///
/// # Variants
/// - `ActualActual365`: Actual days / 365
/// - `ActualActual360`: Actual days / 360
/// - `Thirty360`: 30/360 US bond basis
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayCountConvention {
    /// Actual/365 Fixed
    #[default]
    ActualActual365,
    /// Actual/360
    ActualActual360,
    /// 30/360 US Bond Basis
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    ///
    /// ```
    /// use market_core::types::time::DayCountConvention;
    ///
    /// assert_eq!(DayCountConvention::ActualActual360.name(), "ACT/360");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::ActualActual365 => "ACT/365",
            DayCountConvention::ActualActual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Year fraction between two dates; negative when `start > end`.
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::ActualActual365 => (end - start) as f64 / 365.0,
            DayCountConvention::ActualActual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (from, to, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };

                let d1 = if from.day() == 31 { 30 } else { from.day() };
                let d2 = if to.day() == 31 && d1 == 30 { 30 } else { to.day() };

                let days = 360 * (to.year() - from.year())
                    + 30 * (to.month() as i32 - from.month() as i32)
                    + (d2 as i32 - d1 as i32);
                sign * days as f64 / 360.0
            }
        }
    }
}

impl FromStr for DayCountConvention {
    type Err = DateError;

    /// Parses a convention name (case-insensitive, `/` and spaces ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(['/', ' '], "").as_str() {
            "ACT365" | "ACTUAL365" | "A365" => Ok(DayCountConvention::ActualActual365),
            "ACT360" | "ACTUAL360" | "A360" => Ok(DayCountConvention::ActualActual360),
            "30360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            _ => Err(DateError::UnknownDayCount(s.to_string())),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    // ========================================
    // Date Tests
    // ========================================

    #[test]
    fn test_from_ymd_invalid() {
        let result = Date::from_ymd(2024, 2, 30);
        assert_eq!(
            result,
            Err(DateError::InvalidDate {
                year: 2024,
                month: 2,
                day: 30
            })
        );
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        let d: Date = "2024-01-03".parse().unwrap();
        assert_eq!(d.to_string(), "2024-01-03");
        assert_eq!(d, date(2024, 1, 3));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(Date::parse(" 2024-01-03 ").unwrap(), date(2024, 1, 3));
    }

    #[test]
    fn test_ordering() {
        assert!(date(2024, 1, 1) < date(2024, 1, 2));
        assert_eq!(date(2024, 1, 2) - date(2024, 1, 1), 1);
    }

    // ========================================
    // Day Count Tests
    // ========================================

    #[test]
    fn test_act_365_one_year() {
        let yf = DayCountConvention::ActualActual365.year_fraction(date(2023, 1, 1), date(2024, 1, 1));
        assert_relative_eq!(yf, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_act_360_half_year() {
        let yf = DayCountConvention::ActualActual360.year_fraction(date(2024, 1, 1), date(2024, 7, 1));
        assert_relative_eq!(yf, 182.0 / 360.0, epsilon = 1e-12);
    }

    #[test]
    fn test_thirty_360_month_end() {
        let yf = DayCountConvention::Thirty360.year_fraction(date(2024, 1, 31), date(2024, 3, 31));
        assert_relative_eq!(yf, 60.0 / 360.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reversed_dates_are_negative() {
        let conv = DayCountConvention::Thirty360;
        let fwd = conv.year_fraction(date(2024, 1, 15), date(2024, 4, 15));
        let back = conv.year_fraction(date(2024, 4, 15), date(2024, 1, 15));
        assert_relative_eq!(fwd, -back, epsilon = 1e-12);
    }

    #[test]
    fn test_day_count_from_str() {
        assert_eq!("act/360".parse::<DayCountConvention>().unwrap(), DayCountConvention::ActualActual360);
        assert_eq!("30/360".parse::<DayCountConvention>().unwrap(), DayCountConvention::Thirty360);
        assert!("ACT/ACT".parse::<DayCountConvention>().is_err());
    }
}
