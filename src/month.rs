//! Calendar month ranges parsed from `YYYY-MM` strings.
//!
//! Listing, summaries and reports all restrict expenses with the same
//! [MonthRange], so a report's expense list always covers exactly the days
//! its summary does.

use std::{fmt::Display, str::FromStr};

use serde::{Serialize, Serializer};
use time::{Date, Month};

use crate::Error;

/// The inclusive range of days in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthRange {
    start: Date,
    end: Date,
}

impl MonthRange {
    /// Create the range for `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `year` is outside the supported range.
    pub fn new(year: i32, month: Month) -> Result<Self, Error> {
        let out_of_range = |_| Error::validation("month", format!("{year} is not a valid year"));
        let start = Date::from_calendar_date(year, month, 1).map_err(out_of_range)?;
        let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
            .map_err(out_of_range)?;

        Ok(Self { start, end })
    }

    /// Parse a month in the format `YYYY-MM`, e.g. "2024-02".
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] for the field "month" if `text` is not
    /// four digits, a hyphen and two digits, or if the month is not 01-12.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let malformed = || {
            Error::validation(
                "month",
                format!("\"{text}\" is not a valid month, expected the format YYYY-MM"),
            )
        };

        let (year, month) = text.split_once('-').ok_or_else(malformed)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|byte| byte.is_ascii_digit())
            || !month.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(malformed());
        }

        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u8 = month.parse().map_err(|_| malformed())?;
        let month = Month::try_from(month).map_err(|_| malformed())?;

        Self::new(year, month)
    }

    /// Parse a month that a request must provide.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] for the field "month" if `text` is
    /// missing, blank or malformed.
    pub fn required(text: Option<&str>) -> Result<Self, Error> {
        match text.map(str::trim) {
            None | Some("") => Err(Error::validation("month", "month is required")),
            Some(text) => Self::parse(text),
        }
    }

    /// The first day of the month.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The last day of the month.
    pub fn end(&self) -> Date {
        self.end
    }
}

impl FromStr for MonthRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonthRange::parse(s)
    }
}

impl Display for MonthRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.start.year(), u8::from(self.start.month()))
    }
}

impl Serialize for MonthRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Reads and writes [time::Date] as `YYYY-MM-DD`.
pub(crate) mod date_format {
    use serde::Serializer;
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn parse(text: &str) -> Result<Date, time::error::Parse> {
        Date::parse(text, DATE_FORMAT)
    }
}
