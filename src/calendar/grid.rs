use std::iter::successors;
use thiserror::Error;
use time::{Date, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

pub(crate) fn is_weekday(date: Date) -> bool {
    !is_weekend(date)
}

pub(crate) fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

/// A month of a specific year; the unit the picker displays
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub(crate) fn of(date: Date) -> YearMonth {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        YearMonth::of(date) == *self
    }

    pub(crate) fn first_day(&self) -> Result<Date, OutOfTimeError> {
        Date::from_calendar_date(self.year, self.month, 1).map_err(|_| OutOfTimeError)
    }

    /// Every date in the month, in order.  Empty if the month lies outside
    /// the range of representable dates.
    pub(crate) fn days(&self) -> impl Iterator<Item = Date> {
        let this = *self;
        let first = self.first_day().ok();
        successors(first, |d| d.next_day()).take_while(move |&d| this.contains(d))
    }

    /// Returns the date in this month with the given day of the month,
    /// clamped to the last day of the month
    pub(crate) fn clamp_day(&self, day: u8) -> Result<Date, OutOfTimeError> {
        self.days()
            .take_while(|d| d.day() <= day)
            .last()
            .ok_or(OutOfTimeError)
    }

    pub(crate) fn next_month(&self) -> Result<YearMonth, OutOfTimeError> {
        if self.month == Month::December {
            YearMonth::checked(self.year_after()?, Month::January)
        } else {
            YearMonth::checked(self.year, self.month.next())
        }
    }

    pub(crate) fn previous_month(&self) -> Result<YearMonth, OutOfTimeError> {
        if self.month == Month::January {
            YearMonth::checked(self.year_before()?, Month::December)
        } else {
            YearMonth::checked(self.year, self.month.previous())
        }
    }

    pub(crate) fn next_year(&self) -> Result<YearMonth, OutOfTimeError> {
        YearMonth::checked(self.year_after()?, self.month)
    }

    pub(crate) fn previous_year(&self) -> Result<YearMonth, OutOfTimeError> {
        YearMonth::checked(self.year_before()?, self.month)
    }

    fn year_after(&self) -> Result<i32, OutOfTimeError> {
        self.year.checked_add(1).ok_or(OutOfTimeError)
    }

    fn year_before(&self) -> Result<i32, OutOfTimeError> {
        self.year.checked_sub(1).ok_or(OutOfTimeError)
    }

    fn checked(year: i32, month: Month) -> Result<YearMonth, OutOfTimeError> {
        if (Date::MIN.year()..=Date::MAX.year()).contains(&year) {
            Ok(YearMonth { year, month })
        } else {
            Err(OutOfTimeError)
        }
    }
}

/// Lays out a month Sunday-first: one `None` for each weekday preceding the
/// 1st, then every date of the month.  There is no trailing padding.
pub(crate) fn month_grid(ym: YearMonth) -> Vec<Option<Date>> {
    let mut cells = Vec::with_capacity(DAYS_IN_WEEK * 6);
    if let Ok(first) = ym.first_day() {
        cells.resize(usize::from(first.weekday().index0()), None);
    }
    cells.extend(ym.days().map(Some));
    cells
}

/// Iterates over every date from `start` through `end` inclusive.  Yields
/// nothing if `start > end`.
pub(crate) fn days_between(start: Date, end: Date) -> impl Iterator<Item = Date> {
    let first = (start <= end).then_some(start);
    successors(first, |d| d.next_day()).take_while(move |&d| d <= end)
}

pub(crate) fn weekends_between(start: Date, end: Date) -> Vec<Date> {
    days_between(start, end).filter(|&d| is_weekend(d)).collect()
}
