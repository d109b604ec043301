use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

/// A calendar month of a specific year. The month is always in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is outside `1..=12` or the year is beyond
    /// what the calendar can represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.days()).unwrap_or(NaiveDate::MAX)
    }

    /// Inclusive timestamp bounds: first day at 00:00:00 through the last
    /// day at 23:59:59.
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.first_day().and_time(NaiveTime::MIN);
        let end_time = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        (start, self.last_day().and_time(end_time))
    }

    /// Moves by `delta` months, crossing year boundaries as needed.
    pub fn shift(&self, delta: i32) -> Self {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + delta as i64;
        let year = index.div_euclid(12) as i32;
        let month = index.rem_euclid(12) as u32 + 1;
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    /// Renders as `YYYY/MM` with a zero-padded month.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

/// Serializes as the rendered `YYYY/MM` key.
impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years_follow_century_rule() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(-4));
    }

    #[test]
    fn month_lengths_cover_all_cases() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn rejects_invalid_months() {
        assert!(YearMonth::new(2025, 0).is_none());
        assert!(YearMonth::new(2025, 13).is_none());
        assert!(YearMonth::new(2025, 12).is_some());
    }

    #[test]
    fn shift_crosses_year_boundaries() {
        let jan = YearMonth::new(2025, 1).unwrap();
        assert_eq!(jan.shift(-1), YearMonth::new(2024, 12).unwrap());
        assert_eq!(jan.shift(-13), YearMonth::new(2023, 12).unwrap());
        assert_eq!(jan.shift(11), YearMonth::new(2025, 12).unwrap());
        assert_eq!(jan.shift(12), YearMonth::new(2026, 1).unwrap());
    }

    #[test]
    fn display_zero_pads_month() {
        let ym = YearMonth::new(2024, 7).unwrap();
        assert_eq!(ym.to_string(), "2024/07");
    }

    #[test]
    fn serializes_as_rendered_key() {
        let ym = YearMonth::new(2024, 7).unwrap();
        assert_eq!(serde_json::to_value(ym).unwrap(), serde_json::json!("2024/07"));
    }

    #[test]
    fn bounds_end_at_last_second() {
        let (start, end) = YearMonth::new(2025, 3).unwrap().bounds();
        assert_eq!(start.to_string(), "2025-03-01 00:00:00");
        assert_eq!(end.to_string(), "2025-03-31 23:59:59");
    }
}
