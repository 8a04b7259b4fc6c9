//! # Reporting Periods
//!
//! The local tax year runs from 1 April to 31 March. Callers identify it
//! with a `YYYY-YY` string (`"2023-24"` covers 2023-04-01 through
//! 2024-03-31). The return is filed for the following assessment year.
//!
//! Capital gains are additionally reported by accrual/receipt period: four
//! quarters that close on the 15th of June, September, December and March,
//! plus a short final period running to 31 March.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated tax year (financial year) with its date boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxYear {
    start_year: i32,
    start: NaiveDate,
    end: NaiveDate,
}

impl TaxYear {
    /// Parse a `YYYY-YY` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTaxYear`] if the string is not a
    /// four-digit year, a dash, and the two-digit suffix of the next year.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidTaxYear {
            value: value.to_string(),
            reason,
        };

        let (head, tail) = value
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected YYYY-YY".to_string()))?;

        if head.len() != 4 || !head.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("start year must be four digits".to_string()));
        }
        if tail.len() != 2 || !tail.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("end-year suffix must be two digits".to_string()));
        }

        let start_year: i32 = head
            .parse()
            .map_err(|_| invalid("start year is not a number".to_string()))?;
        let suffix: i32 = tail
            .parse()
            .map_err(|_| invalid("suffix is not a number".to_string()))?;

        let expected = (start_year + 1) % 100;
        if suffix != expected {
            return Err(invalid(format!("suffix must be {expected:02}")));
        }

        Self::from_start_year(start_year).ok_or_else(|| invalid("year out of range".to_string()))
    }

    /// Build the tax year starting on 1 April of `start_year`.
    ///
    /// Returns `None` when the boundary dates cannot be represented.
    pub fn from_start_year(start_year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(start_year, 4, 1)?;
        let end = NaiveDate::from_ymd_opt(start_year + 1, 3, 31)?;
        Some(Self {
            start_year,
            start,
            end,
        })
    }

    /// The calendar year in which the tax year starts.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// First day of the tax year (1 April).
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the tax year (31 March).
    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls within the year, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The assessment year in which this year's income is assessed,
    /// formatted `YYYY-YY` (e.g. `"2024-25"` for tax year `"2023-24"`).
    pub fn assessment_year(&self) -> String {
        let ay = self.start_year + 1;
        format!("{ay}-{:02}", (ay + 1) % 100)
    }

    /// Map a date inside the year onto its accrual/receipt period.
    ///
    /// Returns `None` for dates outside the year.
    pub fn quarter_of(&self, date: NaiveDate) -> Option<AccrualQuarter> {
        if !self.contains(date) {
            return None;
        }
        let md = (date.month(), date.day());
        let quarter = if date.year() == self.start_year {
            if md <= (6, 15) {
                AccrualQuarter::UpTo15Jun
            } else if md <= (9, 15) {
                AccrualQuarter::From16JunTo15Sep
            } else if md <= (12, 15) {
                AccrualQuarter::From16SepTo15Dec
            } else {
                AccrualQuarter::From16DecTo15Mar
            }
        } else if md <= (3, 15) {
            AccrualQuarter::From16DecTo15Mar
        } else {
            AccrualQuarter::From16MarTo31Mar
        };
        Some(quarter)
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.start_year, (self.start_year + 1) % 100)
    }
}

impl std::str::FromStr for TaxYear {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TaxYear {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaxYear> for String {
    fn from(year: TaxYear) -> Self {
        year.to_string()
    }
}

/// The five accrual/receipt periods of a tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccrualQuarter {
    /// 1 April to 15 June.
    UpTo15Jun,
    /// 16 June to 15 September.
    From16JunTo15Sep,
    /// 16 September to 15 December.
    From16SepTo15Dec,
    /// 16 December to 15 March.
    From16DecTo15Mar,
    /// 16 March to 31 March.
    From16MarTo31Mar,
}

impl AccrualQuarter {
    /// Number of accrual periods in a tax year.
    pub const COUNT: usize = 5;

    /// Zero-based position of the period within the year.
    pub fn index(&self) -> usize {
        match self {
            Self::UpTo15Jun => 0,
            Self::From16JunTo15Sep => 1,
            Self::From16SepTo15Dec => 2,
            Self::From16DecTo15Mar => 3,
            Self::From16MarTo31Mar => 4,
        }
    }

    /// All periods in chronological order.
    pub fn all() -> &'static [AccrualQuarter] {
        &[
            Self::UpTo15Jun,
            Self::From16JunTo15Sep,
            Self::From16SepTo15Dec,
            Self::From16DecTo15Mar,
            Self::From16MarTo31Mar,
        ]
    }
}

/// Whole months elapsed between two dates.
///
/// A month only counts once the day-of-month has been reached again, so
/// 2022-01-15 to 2022-02-14 is zero months and to 2022-02-15 is one.
/// Returns a negative value when `to` precedes `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut months = (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    if months > 0 && to.day() < from.day() {
        months -= 1;
    } else if months < 0 && to.day() > from.day() {
        months += 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_valid_tax_year() {
        let ty = TaxYear::parse("2023-24").unwrap();
        assert_eq!(ty.start_year(), 2023);
        assert_eq!(ty.start_date(), d(2023, 4, 1));
        assert_eq!(ty.end_date(), d(2024, 3, 31));
        assert_eq!(ty.to_string(), "2023-24");
    }

    #[test]
    fn parse_century_rollover() {
        let ty = TaxYear::parse("2099-00").unwrap();
        assert_eq!(ty.end_date(), d(2100, 3, 31));
    }

    #[test]
    fn parse_rejects_non_consecutive_suffix() {
        let err = TaxYear::parse("2023-25").unwrap_err();
        assert!(format!("{err}").contains("suffix must be 24"));
    }

    #[test]
    fn parse_rejects_malformed_strings() {
        for bad in ["2023", "23-24", "2023-2024", "abcd-ef", "", "2023_24"] {
            assert!(TaxYear::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn contains_is_inclusive() {
        let ty = TaxYear::parse("2023-24").unwrap();
        assert!(ty.contains(d(2023, 4, 1)));
        assert!(ty.contains(d(2024, 3, 31)));
        assert!(!ty.contains(d(2023, 3, 31)));
        assert!(!ty.contains(d(2024, 4, 1)));
    }

    #[test]
    fn assessment_year_is_next_year() {
        let ty = TaxYear::parse("2023-24").unwrap();
        assert_eq!(ty.assessment_year(), "2024-25");
    }

    #[test]
    fn quarter_boundaries() {
        let ty = TaxYear::parse("2023-24").unwrap();
        assert_eq!(ty.quarter_of(d(2023, 4, 1)), Some(AccrualQuarter::UpTo15Jun));
        assert_eq!(ty.quarter_of(d(2023, 6, 15)), Some(AccrualQuarter::UpTo15Jun));
        assert_eq!(ty.quarter_of(d(2023, 6, 16)), Some(AccrualQuarter::From16JunTo15Sep));
        assert_eq!(ty.quarter_of(d(2023, 9, 16)), Some(AccrualQuarter::From16SepTo15Dec));
        assert_eq!(ty.quarter_of(d(2023, 12, 16)), Some(AccrualQuarter::From16DecTo15Mar));
        assert_eq!(ty.quarter_of(d(2024, 1, 20)), Some(AccrualQuarter::From16DecTo15Mar));
        assert_eq!(ty.quarter_of(d(2024, 3, 15)), Some(AccrualQuarter::From16DecTo15Mar));
        assert_eq!(ty.quarter_of(d(2024, 3, 16)), Some(AccrualQuarter::From16MarTo31Mar));
        assert_eq!(ty.quarter_of(d(2024, 4, 1)), None);
    }

    #[test]
    fn quarter_indices_are_chronological() {
        for (i, q) in AccrualQuarter::all().iter().enumerate() {
            assert_eq!(q.index(), i);
        }
        assert_eq!(AccrualQuarter::all().len(), AccrualQuarter::COUNT);
    }

    #[test]
    fn months_between_counts_whole_months() {
        assert_eq!(months_between(d(2022, 1, 1), d(2023, 6, 1)), 17);
        assert_eq!(months_between(d(2022, 1, 1), d(2024, 6, 1)), 29);
        assert_eq!(months_between(d(2022, 1, 15), d(2022, 2, 14)), 0);
        assert_eq!(months_between(d(2022, 1, 15), d(2022, 2, 15)), 1);
        assert_eq!(months_between(d(2022, 1, 1), d(2024, 1, 1)), 24);
        assert_eq!(months_between(d(2022, 1, 1), d(2022, 1, 1)), 0);
    }

    #[test]
    fn serde_roundtrip_as_string() {
        let ty = TaxYear::parse("2023-24").unwrap();
        let json = serde_json::to_string(&ty).unwrap();
        assert_eq!(json, "\"2023-24\"");
        let back: TaxYear = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }
}
