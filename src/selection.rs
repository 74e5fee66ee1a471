use crate::calendar::{is_weekday, weekends_between, OutOfTimeError};
use thiserror::Error;
use time::{Date, Duration};

/// An inclusive range of dates with `start <= end`
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub(crate) fn new(start: Date, end: Date) -> Result<DateRange, RangeError> {
        if start <= end {
            Ok(DateRange { start, end })
        } else {
            Err(RangeError::EndBeforeStart { start, end })
        }
    }

    pub(crate) fn start(&self) -> Date {
        self.start
    }

    pub(crate) fn end(&self) -> Date {
        self.end
    }

    pub(crate) fn weekends(&self) -> Vec<Date> {
        weekends_between(self.start, self.end)
    }

    pub(crate) fn outcome(self) -> Outcome {
        Outcome {
            range: self,
            weekends: self.weekends(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum RangeError {
    #[error("range end {end} is before range start {start}")]
    EndBeforeStart { start: Date, end: Date },
    #[error("{0} is not a weekday")]
    NotAWeekday(Date),
}

/// What a completed selection reports: the range and every weekend date in
/// it
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Outcome {
    pub(crate) range: DateRange,
    pub(crate) weekends: Vec<Date>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Click {
    /// The date cannot be picked right now: it falls on a weekend, or it does
    /// not come after the pending start
    Ignored,
    /// A new range was begun at the date
    Started,
    Completed(DateRange),
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Selection {
    start: Option<Date>,
    end: Option<Date>,
    hover: Option<Date>,
}

impl Selection {
    pub(crate) fn new() -> Selection {
        Selection::default()
    }

    pub(crate) fn from_range(range: DateRange) -> Selection {
        Selection {
            start: Some(range.start),
            end: Some(range.end),
            hover: None,
        }
    }

    pub(crate) fn start(&self) -> Option<Date> {
        self.start
    }

    /// True when a start has been picked and the end has not
    pub(crate) fn is_pending(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub(crate) fn click(&mut self, date: Date) -> Click {
        if !is_weekday(date) {
            return Click::Ignored;
        }
        if let (Some(start), None) = (self.start, self.end) {
            if date <= start {
                return Click::Ignored;
            }
            self.end = Some(date);
            self.hover = None;
            Click::Completed(DateRange { start, end: date })
        } else {
            self.start = Some(date);
            self.end = None;
            Click::Started
        }
    }

    /// Records `date` as the hover preview's far end.  Has no effect unless a
    /// start is pending.
    pub(crate) fn hover(&mut self, date: Date) {
        if self.is_pending() {
            self.hover = Some(date);
        }
    }

    pub(crate) fn leave(&mut self) {
        self.hover = None;
    }

    pub(crate) fn in_hover_range(&self, date: Date) -> bool {
        match (self.start, self.end, self.hover) {
            (Some(start), None, Some(hover)) => start <= date && date <= hover,
            _ => false,
        }
    }

    pub(crate) fn in_selected_range(&self, date: Date) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    /// Selects the `days` calendar days leading up to and including `today`.
    /// The start lands `days` days before `today`, so the range spans
    /// `days + 1` dates; neither end is required to be a weekday.
    pub(crate) fn apply_preset(
        &mut self,
        today: Date,
        days: u32,
    ) -> Result<DateRange, OutOfTimeError> {
        let start = today
            .checked_sub(Duration::days(i64::from(days)))
            .ok_or(OutOfTimeError)?;
        let range = DateRange { start, end: today };
        *self = Selection::from_range(range);
        Ok(range)
    }
}
