//! Month arithmetic for the monthly result pages

use crate::{Result, ScrapeError};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// A calendar month, printed as `YYYYMM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if (1..=12).contains(&month) {
            Ok(YearMonth { year, month })
        } else {
            Err(ScrapeError::InvalidMonth(format!("{}{:02}", year, month)))
        }
    }

    /// Parse `YYYYMM`, e.g. `201804`
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || ScrapeError::InvalidMonth(s.to_string());
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = s[..4].parse().map_err(|_| invalid())?;
        let month = s[4..].parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.year, self.month)
    }
}

/// Every month from `since` up to and including `until`
pub fn months_between(since: YearMonth, until: YearMonth) -> Vec<YearMonth> {
    let mut months = Vec::new();
    let mut current = since;
    while current <= until {
        months.push(current);
        current = current.next();
    }
    months
}
