//! Normalizes German `day.month` date tokens into calendar date ranges.

use chrono::NaiveDate;
use regex::{Captures, Regex};

static FORMAT: &str = "%Y-%m-%d";

/// A start and end date derived from one date token.
///
/// A single-day token yields `start == end`. Both ends always carry the
/// reference year; a range spanning the year boundary is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_iso(&self) -> String {
        self.start.format(FORMAT).to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format(FORMAT).to_string()
    }
}

/// A well-formed token naming a day that does not exist in the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no such calendar date: {day:02}.{month:02}.{year}")]
pub struct InvalidDateError {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

/// Parses `DD.MM.` and `DD.MM.-DD.MM.` tokens against a fixed reference year.
pub struct DateRangeParser {
    year: i32,
    range_regex: Regex,
    single_regex: Regex,
}

impl DateRangeParser {
    pub fn new(year: i32) -> Self {
        let range_regex = Regex::new(
            r"(?x)
                ^
                (?P<day1>\d{2})\.(?P<month1>\d{2})\. # first day.month token
                \s*-\s* # range separator
                (?P<day2>\d{2})\.(?P<month2>\d{2})\.
            ",
        )
        .unwrap();
        let single_regex = Regex::new(r"^(?P<day>\d{2})\.(?P<month>\d{2})\.").unwrap();
        Self {
            year,
            range_regex,
            single_regex,
        }
    }

    /// Parse one raw date token.
    ///
    /// Returns `Ok(None)` when the token matches neither pattern. The range
    /// pattern is tried first so that `02.11.-06.11.` is not misread as the
    /// single date `02.11.`. An inverted range is returned verbatim, not
    /// reordered.
    pub fn parse(&self, token: &str) -> Result<Option<DateRange>, InvalidDateError> {
        let token = token.trim();
        if let Some(captures) = self.range_regex.captures(token) {
            let start = self.date_from(&captures, "day1", "month1")?;
            let end = self.date_from(&captures, "day2", "month2")?;
            return Ok(Some(DateRange { start, end }));
        }
        if let Some(captures) = self.single_regex.captures(token) {
            let start = self.date_from(&captures, "day", "month")?;
            return Ok(Some(DateRange { start, end: start }));
        }
        Ok(None)
    }

    fn date_from(
        &self,
        captures: &Captures,
        day_group: &str,
        month_group: &str,
    ) -> Result<NaiveDate, InvalidDateError> {
        let day: u32 = captures[day_group].parse().unwrap();
        let month: u32 = captures[month_group].parse().unwrap();
        NaiveDate::from_ymd_opt(self.year, month, day).ok_or(InvalidDateError {
            day,
            month,
            year: self.year,
        })
    }
}
