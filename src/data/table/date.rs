//! Date header parsing
//!
//! Date rows carry only month and day(s), e.g. `4月10日` or `4月10・11日`;
//! the year comes from the page heading (`2018年4月`).

use crate::{Result, ScrapeError};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Days a group of rows was played on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn single(day: NaiveDate) -> Self {
        DateRange {
            begin: day,
            end: day,
        }
    }
}

fn single_day_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]{1,2})月([0-9]{1,2})日").expect("valid regex"))
}

fn two_day_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]{1,2})月([0-9]{1,2})・([0-9]{1,2})日").expect("valid regex")
    })
}

fn year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)年").expect("valid regex"))
}

/// Parse the text of a date row against the page year.
///
/// Text after the closing `日` is ignored. Anything that matches neither
/// the single-day nor the two-day form is a structural error.
pub fn parse_date_range(text: &str, year: i32) -> Result<DateRange> {
    let trimmed = text.trim();
    let malformed = || ScrapeError::MalformedDate(trimmed.to_string());

    let (month, begin_day, end_day) = if let Some(caps) = single_day_pattern().captures(trimmed) {
        let day = number(&caps[2]).ok_or_else(malformed)?;
        (number(&caps[1]).ok_or_else(malformed)?, day, day)
    } else if let Some(caps) = two_day_pattern().captures(trimmed) {
        (
            number(&caps[1]).ok_or_else(malformed)?,
            number(&caps[2]).ok_or_else(malformed)?,
            number(&caps[3]).ok_or_else(malformed)?,
        )
    } else {
        return Err(malformed());
    };

    let begin = NaiveDate::from_ymd_opt(year, month, begin_day).ok_or_else(malformed)?;
    let end = NaiveDate::from_ymd_opt(year, month, end_day).ok_or_else(malformed)?;

    Ok(DateRange { begin, end })
}

/// Parse the page heading's leading `<year>年`
pub fn parse_year(text: &str) -> Result<i32> {
    let trimmed = text.trim();
    year_pattern()
        .captures(trimmed)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| ScrapeError::MalformedYear(trimmed.to_string()))
}

fn number(s: &str) -> Option<u32> {
    s.parse().ok()
}
