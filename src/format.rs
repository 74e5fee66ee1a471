use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");
static DMY_FMT: &[FormatItem<'_>] = format_description!("[day]/[month]/[year]");
static MDY_FMT: &[FormatItem<'_>] = format_description!("[month]/[day]/[year]");

pub(crate) static PLACEHOLDER: &str = "Select date range";

/// How dates are written in the date-range field and in the program's output
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub(crate) enum DateFormat {
    #[default]
    YearMonthDay,
    DayMonthYear,
    MonthDayYear,
}

impl DateFormat {
    fn items(self) -> &'static [FormatItem<'static>] {
        match self {
            DateFormat::YearMonthDay => YMD_FMT,
            DateFormat::DayMonthYear => DMY_FMT,
            DateFormat::MonthDayYear => MDY_FMT,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "YYYY-MM-DD",
            DateFormat::DayMonthYear => "DD/MM/YYYY",
            DateFormat::MonthDayYear => "MM/DD/YYYY",
        }
    }

    pub(crate) fn format(self, date: Date) -> String {
        match date.format(self.items()) {
            Ok(s) => s,
            // Only reachable for components the descriptions above don't
            // use, but avoid panicking in the UI regardless
            Err(_) => date.to_string(),
        }
    }

    pub(crate) fn parse(self, s: &str) -> Result<Date, time::error::Parse> {
        Date::parse(s, self.items())
    }

    pub(crate) fn format_range(self, start: Date, end: Date) -> String {
        format!("{} to {}", self.format(start), self.format(end))
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = ParseDateFormatError;

    fn from_str(s: &str) -> Result<DateFormat, ParseDateFormatError> {
        [
            DateFormat::YearMonthDay,
            DateFormat::DayMonthYear,
            DateFormat::MonthDayYear,
        ]
        .into_iter()
        .find(|df| df.as_str() == s)
        .ok_or_else(|| ParseDateFormatError(s.to_owned()))
    }
}

impl TryFrom<String> for DateFormat {
    type Error = ParseDateFormatError;

    fn try_from(s: String) -> Result<DateFormat, ParseDateFormatError> {
        s.parse()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid date format {0:?}; expected YYYY-MM-DD, DD/MM/YYYY, or MM/DD/YYYY")]
pub(crate) struct ParseDateFormatError(String);
