use super::grid::{OutOfTimeError, YearMonth};
use crate::config::Preset;
use crate::selection::{Click, DateRange, Selection};
use ratatui::layout::{Position, Rect};
use time::{Date, Duration};

/// State of the date-range picker popup: which month is on display, where
/// the keyboard cursor is, and what has been picked so far
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Picker {
    pub(super) today: Date,
    pub(super) view: YearMonth,
    pub(super) cursor: Date,
    pub(super) selection: Selection,
    pub(super) presets: Vec<Preset>,
    pub(super) hits: HitMap,
}

impl Picker {
    pub(crate) fn new(today: Date, presets: Vec<Preset>) -> Picker {
        Picker {
            today,
            view: YearMonth::of(today),
            cursor: today,
            selection: Selection::new(),
            presets,
            hits: HitMap::default(),
        }
    }

    /// Reopen the picker on a previously chosen range so that it is shown
    /// highlighted
    pub(crate) fn with_range(mut self, range: DateRange) -> Picker {
        self.selection = Selection::from_range(range);
        self.set_cursor(range.start());
        self
    }

    /// Open the picker with `start` already picked as the start of a range
    pub(crate) fn with_pending_start(mut self, start: Date) -> Picker {
        let mut selection = Selection::new();
        if selection.click(start) == Click::Started {
            self.selection = selection;
            self.set_cursor(start);
        }
        self
    }

    #[cfg(test)]
    pub(crate) fn selection(&self) -> &Selection {
        &self.selection
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Date {
        self.cursor
    }

    pub(crate) fn handle_input(&mut self, input: PickerInput) -> PickerOutput {
        let r = match input {
            PickerInput::PreviousYear => self.change_view(YearMonth::previous_year),
            PickerInput::NextYear => self.change_view(YearMonth::next_year),
            PickerInput::PreviousMonth => self.change_view(YearMonth::previous_month),
            PickerInput::NextMonth => self.change_view(YearMonth::next_month),
            PickerInput::Left => self.move_cursor(-1),
            PickerInput::Right => self.move_cursor(1),
            PickerInput::Up => self.move_cursor(-7),
            PickerInput::Down => self.move_cursor(7),
            PickerInput::Today => {
                self.set_cursor(self.today);
                Ok(())
            }
            PickerInput::Select => return self.click(self.cursor),
            PickerInput::Preset(i) => return self.choose_preset(i),
        };
        match r {
            Ok(()) => PickerOutput::Ok,
            Err(e) => {
                tracing::debug!(?input, "{e}");
                PickerOutput::Invalid
            }
        }
    }

    /// Handle the mouse pointer moving to the given screen position
    pub(crate) fn hover_at(&mut self, x: u16, y: u16) {
        match self.hits.target_at(x, y) {
            Some(Target::Day(date)) => {
                self.cursor = date;
                self.selection.hover(date);
            }
            _ => self.selection.leave(),
        }
    }

    /// Handle a mouse click at the given screen position.  Clicks that land on
    /// nothing are ignored without complaint.
    pub(crate) fn click_at(&mut self, x: u16, y: u16) -> PickerOutput {
        let input = match self.hits.target_at(x, y) {
            Some(Target::Day(date)) => {
                self.cursor = date;
                return self.click(date);
            }
            Some(Target::PreviousYear) => PickerInput::PreviousYear,
            Some(Target::NextYear) => PickerInput::NextYear,
            Some(Target::PreviousMonth) => PickerInput::PreviousMonth,
            Some(Target::NextMonth) => PickerInput::NextMonth,
            Some(Target::Preset(i)) => PickerInput::Preset(i),
            None => return PickerOutput::Ok,
        };
        self.handle_input(input)
    }

    fn click(&mut self, date: Date) -> PickerOutput {
        match self.selection.click(date) {
            Click::Ignored => PickerOutput::Invalid,
            Click::Started => {
                tracing::debug!(start = %date, "range start picked");
                self.selection.hover(date);
                PickerOutput::Ok
            }
            Click::Completed(range) => {
                tracing::info!(start = %range.start(), end = %range.end(), "range picked");
                PickerOutput::Done(range)
            }
        }
    }

    fn choose_preset(&mut self, index: usize) -> PickerOutput {
        let Some(preset) = self.presets.get(index) else {
            return PickerOutput::Invalid;
        };
        match self.selection.apply_preset(self.today, preset.days) {
            Ok(range) => {
                tracing::info!(
                    preset = %preset.label,
                    start = %range.start(),
                    end = %range.end(),
                    "preset range picked"
                );
                PickerOutput::Done(range)
            }
            Err(e) => {
                tracing::debug!(preset = %preset.label, "{e}");
                PickerOutput::Invalid
            }
        }
    }

    fn change_view<F>(&mut self, func: F) -> Result<(), OutOfTimeError>
    where
        F: FnOnce(&YearMonth) -> Result<YearMonth, OutOfTimeError>,
    {
        let view = func(&self.view)?;
        let cursor = view.clamp_day(self.cursor.day())?;
        self.view = view;
        self.cursor = cursor;
        self.selection.hover(cursor);
        Ok(())
    }

    fn move_cursor(&mut self, days: i64) -> Result<(), OutOfTimeError> {
        let cursor = self
            .cursor
            .checked_add(Duration::days(days))
            .ok_or(OutOfTimeError)?;
        self.set_cursor(cursor);
        Ok(())
    }

    fn set_cursor(&mut self, date: Date) {
        self.cursor = date;
        self.view = YearMonth::of(date);
        self.selection.hover(date);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PickerInput {
    PreviousYear,
    NextYear,
    PreviousMonth,
    NextMonth,
    Left,
    Right,
    Up,
    Down,
    Today,
    Select,
    Preset(usize),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PickerOutput {
    Ok,
    Invalid,
    Done(DateRange),
}

/// Something in the picker that responds to the mouse
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Target {
    PreviousYear,
    NextYear,
    PreviousMonth,
    NextMonth,
    Day(Date),
    Preset(usize),
}

/// Screen regions of the mouse targets drawn by the most recent render
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(super) struct HitMap(Vec<(Rect, Target)>);

impl HitMap {
    pub(super) fn clear(&mut self) {
        self.0.clear();
    }

    pub(super) fn push(&mut self, area: Rect, target: Target) {
        if !area.is_empty() {
            self.0.push((area, target));
        }
    }

    fn target_at(&self, x: u16, y: u16) -> Option<Target> {
        self.0
            .iter()
            .find(|(area, _)| area.contains(Position::new(x, y)))
            .map(|&(_, target)| target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Month;

    fn presets() -> Vec<Preset> {
        vec![
            Preset {
                label: String::from("Last 7 Days"),
                days: 7,
            },
            Preset {
                label: String::from("Last 30 Days"),
                days: 30,
            },
        ]
    }

    #[test]
    fn test_new_shows_current_month() {
        let picker = Picker::new(date!(2025 - 10 - 15), presets());
        assert_eq!(picker.view, YearMonth::of(date!(2025 - 10 - 01)));
        assert_eq!(picker.cursor, date!(2025 - 10 - 15));
        assert_eq!(picker.selection, Selection::new());
    }

    #[test]
    fn test_month_navigation_clamps_cursor() {
        let mut picker = Picker::new(date!(2025 - 01 - 31), Vec::new());
        assert_eq!(
            picker.handle_input(PickerInput::NextMonth),
            PickerOutput::Ok
        );
        assert_eq!(picker.view.month(), Month::February);
        assert_eq!(picker.cursor, date!(2025 - 02 - 28));
        assert_eq!(
            picker.handle_input(PickerInput::PreviousMonth),
            PickerOutput::Ok
        );
        assert_eq!(picker.cursor, date!(2025 - 01 - 28));
        assert_eq!(
            picker.handle_input(PickerInput::PreviousMonth),
            PickerOutput::Ok
        );
        assert_eq!(picker.view, YearMonth::of(date!(2024 - 12 - 01)));
    }

    #[test]
    fn test_year_navigation() {
        let mut picker = Picker::new(date!(2024 - 02 - 29), Vec::new());
        assert_eq!(picker.handle_input(PickerInput::NextYear), PickerOutput::Ok);
        assert_eq!(picker.cursor, date!(2025 - 02 - 28));
        assert_eq!(
            picker.handle_input(PickerInput::PreviousYear),
            PickerOutput::Ok
        );
        assert_eq!(picker.view, YearMonth::of(date!(2024 - 02 - 01)));
    }

    #[test]
    fn test_navigation_past_end_of_time_is_invalid() {
        let mut picker = Picker::new(Date::MAX, Vec::new());
        assert_eq!(
            picker.handle_input(PickerInput::NextMonth),
            PickerOutput::Invalid
        );
        assert_eq!(
            picker.handle_input(PickerInput::Right),
            PickerOutput::Invalid
        );
        assert_eq!(picker.cursor, Date::MAX);
    }

    #[test]
    fn test_cursor_movement_follows_into_next_month() {
        let mut picker = Picker::new(date!(2025 - 10 - 29), Vec::new());
        assert_eq!(picker.handle_input(PickerInput::Down), PickerOutput::Ok);
        assert_eq!(picker.cursor, date!(2025 - 11 - 05));
        assert_eq!(picker.view.month(), Month::November);
        picker.handle_input(PickerInput::Left);
        picker.handle_input(PickerInput::Up);
        assert_eq!(picker.cursor, date!(2025 - 10 - 28));
        assert_eq!(picker.view.month(), Month::October);
    }

    #[test]
    fn test_select_with_keyboard() {
        let mut picker = Picker::new(date!(2025 - 10 - 06), Vec::new());
        assert_eq!(picker.handle_input(PickerInput::Select), PickerOutput::Ok);
        picker.handle_input(PickerInput::Right);
        picker.handle_input(PickerInput::Right);
        assert!(picker.selection.in_hover_range(date!(2025 - 10 - 07)));
        let range = DateRange::new(date!(2025 - 10 - 06), date!(2025 - 10 - 08)).unwrap();
        assert_eq!(
            picker.handle_input(PickerInput::Select),
            PickerOutput::Done(range)
        );
    }

    #[test]
    fn test_select_weekend_is_invalid() {
        let mut picker = Picker::new(date!(2025 - 10 - 11), Vec::new());
        assert_eq!(
            picker.handle_input(PickerInput::Select),
            PickerOutput::Invalid
        );
        assert_eq!(picker.selection.start(), None);
    }

    #[test]
    fn test_presets() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), presets());
        let PickerOutput::Done(range) = picker.handle_input(PickerInput::Preset(1)) else {
            panic!("Preset should complete a range");
        };
        assert_eq!(range.start(), date!(2025 - 09 - 15));
        assert_eq!(range.end(), date!(2025 - 10 - 15));
        assert_eq!(
            picker.handle_input(PickerInput::Preset(2)),
            PickerOutput::Invalid
        );
    }

    #[test]
    fn test_with_range() {
        let range = DateRange::new(date!(2025 - 08 - 04), date!(2025 - 08 - 15)).unwrap();
        let picker = Picker::new(date!(2025 - 10 - 15), Vec::new()).with_range(range);
        assert_eq!(picker.view, YearMonth::of(date!(2025 - 08 - 01)));
        assert!(picker.selection.in_selected_range(date!(2025 - 08 - 09)));
    }

    #[test]
    fn test_with_pending_start() {
        let picker = Picker::new(date!(2025 - 10 - 15), Vec::new())
            .with_pending_start(date!(2025 - 10 - 07));
        assert_eq!(picker.selection.start(), Some(date!(2025 - 10 - 07)));
        assert!(picker.selection.is_pending());
        let picker = Picker::new(date!(2025 - 10 - 15), Vec::new())
            .with_pending_start(date!(2025 - 10 - 12));
        assert_eq!(picker.selection.start(), None);
    }

    #[test]
    fn test_mouse_targets() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), Vec::new());
        picker.hits.push(Rect::new(10, 5, 4, 1), Target::Day(date!(2025 - 10 - 06)));
        picker.hits.push(Rect::new(14, 5, 4, 1), Target::Day(date!(2025 - 10 - 07)));
        picker.hits.push(Rect::new(0, 0, 1, 1), Target::NextMonth);
        assert_eq!(picker.click_at(11, 5), PickerOutput::Ok);
        assert_eq!(picker.selection.start(), Some(date!(2025 - 10 - 06)));
        picker.hover_at(17, 5);
        assert!(picker.selection.in_hover_range(date!(2025 - 10 - 07)));
        picker.hover_at(30, 30);
        assert!(!picker.selection.in_hover_range(date!(2025 - 10 - 07)));
        assert_eq!(picker.click_at(30, 30), PickerOutput::Ok);
        let range = DateRange::new(date!(2025 - 10 - 06), date!(2025 - 10 - 07)).unwrap();
        assert_eq!(picker.click_at(15, 5), PickerOutput::Done(range));
        assert_eq!(picker.click_at(0, 0), PickerOutput::Ok);
        assert_eq!(picker.view.month(), Month::November);
    }
}
