use super::grid::{is_weekend, month_grid, WeekdayExt};
use super::picker::{HitMap, Picker, Target};
use crate::config::Preset;
use crate::selection::Selection;
use crate::theme::{picker::*, BASE_STYLE, TITLE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget},
};
use time::Date;

static HEADER: &str = " Su  Mo  Tu  We  Th  Fr  Sa ";

static TITLE: &str = " Pick a weekday range ";

static PRESETS_TITLE: &str = "Quick select:";

/// Number of columns per day of week
const DAY_WIDTH: u16 = 4;

/// Width of the grid of days
const GRID_WIDTH: u16 = DAY_WIDTH * 7;

/// Blank columns between the border and the content on either side
const PADDING: u16 = 1;

const YEAR_ROW: u16 = 0;
const MONTH_ROW: u16 = 1;
const HEADER_ROW: u16 = 3;
const RULE_ROW: u16 = 4;
const FIRST_WEEK_ROW: u16 = 5;

/// A month touches at most six Sunday-first weeks; space is always reserved
/// for all six so that the popup doesn't change size as months change
const WEEK_ROWS: u16 = 6;

const PRESETS_TITLE_ROW: u16 = FIRST_WEEK_ROW + WEEK_ROWS + 1;

const PREV_YEAR: &str = " « ";
const NEXT_YEAR: &str = " » ";
const PREV_MONTH: &str = " ‹ ";
const NEXT_MONTH: &str = " › ";

const ACS_HLINE: char = '─';

/// Popup for picking a date range.  Rendering also records where each
/// clickable element landed so that mouse events can be routed through
/// [`Picker::click_at`] and [`Picker::hover_at`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PickerWidget;

/// Returns a `width` by `height` rectangle centered in `area`, shrunk to fit
/// if `area` is too small
pub(crate) fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [column] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(column);
    popup
}

impl PickerWidget {
    fn content_width(presets: &[Preset]) -> u16 {
        presets
            .iter()
            .enumerate()
            .map(|(i, p)| u16::try_from(preset_line(i, p).width()).unwrap_or(u16::MAX))
            .fold(GRID_WIDTH, u16::max)
    }

    fn content_height(presets: &[Preset]) -> u16 {
        let grid = FIRST_WEEK_ROW + WEEK_ROWS;
        if presets.is_empty() {
            grid
        } else {
            let qty = u16::try_from(presets.len()).unwrap_or(u16::MAX);
            (grid + 2).saturating_add(qty)
        }
    }
}

impl StatefulWidget for PickerWidget {
    type State = Picker;

    /*
     * ┌──── Pick a weekday range ────┐
     * │ «           2025           » │
     * │ ‹          October         › │
     * │                              │
     * │  Su  Mo  Tu  We  Th  Fr  Sa  │
     * │ ──────────────────────────── │
     * │               1   2   3   4  │
     * │   5   6   7   8   9  10  11  │
     * │  ...                         │
     * │                              │
     * │ Quick select:                │
     * │ 1  Last 7 Days               │
     * └──────────────────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let width = Self::content_width(&state.presets).saturating_add(2 * PADDING + 2);
        let height = Self::content_height(&state.presets).saturating_add(2);
        let outer_area = popup_area(area, width, height);
        Clear.render(outer_area, buf);
        let block = Block::bordered()
            .title(TITLE)
            .title_alignment(Alignment::Center)
            .style(BASE_STYLE);
        let inner = block.inner(outer_area).inner(Margin::new(PADDING, 0));
        block.render(outer_area, buf);

        state.hits.clear();
        let mut canvas = BufferCanvas::new(inner, buf, &mut state.hits);
        canvas.draw_nav(
            YEAR_ROW,
            state.view.year().to_string(),
            (PREV_YEAR, Target::PreviousYear),
            (NEXT_YEAR, Target::NextYear),
        );
        canvas.draw_nav(
            MONTH_ROW,
            state.view.month().to_string(),
            (PREV_MONTH, Target::PreviousMonth),
            (NEXT_MONTH, Target::NextMonth),
        );
        let grid_left = canvas.centered_x(GRID_WIDTH);
        canvas.mvprint(
            HEADER_ROW,
            grid_left,
            Line::styled(HEADER, WEEKDAY_HEADER_STYLE),
        );
        canvas.hline(RULE_ROW, grid_left, GRID_WIDTH);
        let styler = DayStyler {
            selection: &state.selection,
            today: state.today,
            cursor: state.cursor,
        };
        for (i, date) in std::iter::zip(0u16.., month_grid(state.view)) {
            let Some(date) = date else {
                continue;
            };
            let week_no = i / 7;
            let x = grid_left + DAY_WIDTH * date.weekday().index0();
            let text = if date == state.cursor {
                format!("[{:2}]", date.day())
            } else {
                format!(" {:2} ", date.day())
            };
            let rect = canvas.mvprint(
                FIRST_WEEK_ROW + week_no,
                x,
                Line::styled(text, styler.style(date)),
            );
            canvas.hits.push(rect, Target::Day(date));
        }
        if !state.presets.is_empty() {
            let title = Line::styled(PRESETS_TITLE, TITLE_STYLE);
            canvas.mvprint(PRESETS_TITLE_ROW, 0, title);
            for (i, preset) in state.presets.iter().enumerate() {
                let y = u16::try_from(i)
                    .map_or(u16::MAX, |i| (PRESETS_TITLE_ROW + 1).saturating_add(i));
                let rect = canvas.mvprint(y, 0, preset_line(i, preset));
                let row = Rect {
                    width: canvas.area.width,
                    ..rect
                };
                canvas.hits.push(row.intersection(canvas.area), Target::Preset(i));
            }
        }
    }
}

fn preset_line(index: usize, preset: &Preset) -> Line<'_> {
    Line::from_iter([
        Span::styled((index + 1).to_string(), PRESET_KEY_STYLE),
        Span::styled("  ", BASE_STYLE),
        Span::styled(preset.label.as_str(), BASE_STYLE),
    ])
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DayStyler<'a> {
    selection: &'a Selection,
    today: Date,
    cursor: Date,
}

impl DayStyler<'_> {
    fn style(&self, date: Date) -> Style {
        let weekend = is_weekend(date);
        let sel = self.selection;
        let mut style = if sel.in_selected_range(date) {
            if weekend {
                SELECTED_WEEKEND_STYLE
            } else {
                SELECTED_STYLE
            }
        } else if sel.in_hover_range(date) || (sel.is_pending() && sel.start() == Some(date)) {
            if weekend {
                HOVER_WEEKEND_STYLE
            } else {
                HOVER_STYLE
            }
        } else if weekend {
            WEEKEND_STYLE
        } else {
            BASE_STYLE
        };
        if date == self.today {
            style = style.add_modifier(TODAY_MODIFIER);
        }
        if date == self.cursor {
            style = style.add_modifier(CURSOR_MODIFIER);
        }
        style
    }
}

#[derive(Debug)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    hits: &'a mut HitMap,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer, hits: &'a mut HitMap) -> Self {
        Self { area, buf, hits }
    }

    fn centered_x(&self, width: u16) -> u16 {
        self.area.width.saturating_sub(width) / 2
    }

    fn draw_nav(
        &mut self,
        y: u16,
        label: String,
        (prev, prev_target): (&str, Target),
        (next, next_target): (&str, Target),
    ) {
        let prev_width = u16::try_from(Span::raw(prev).width()).unwrap_or(u16::MAX);
        let next_width = u16::try_from(Span::raw(next).width()).unwrap_or(u16::MAX);
        let label_width = u16::try_from(Span::raw(label.as_str()).width()).unwrap_or(u16::MAX);
        let rect = self.mvprint(y, 0, Line::styled(prev, NAV_STYLE));
        self.hits.push(rect, prev_target);
        let x = self.centered_x(label_width);
        self.mvprint(y, x, Line::styled(label, NAV_STYLE));
        let x = self.area.width.saturating_sub(next_width).max(prev_width);
        let rect = self.mvprint(y, x, Line::styled(next, NAV_STYLE));
        self.hits.push(rect, next_target);
    }

    /// Draws `line` at the given position relative to the canvas, truncating
    /// it at the canvas's right edge, and returns the screen area it
    /// occupies.  Returns an empty `Rect` if the position is off the canvas.
    fn mvprint(&mut self, y: u16, x: u16, line: Line<'_>) -> Rect {
        if y < self.area.height && x < self.area.width {
            let width = u16::try_from(line.width())
                .unwrap_or(u16::MAX)
                .min(self.area.width - x);
            let rect = Rect {
                x: x + self.area.x,
                y: y + self.area.y,
                width,
                height: 1,
            };
            Paragraph::new(line).render(rect, self.buf);
            rect
        } else {
            Rect::default()
        }
    }

    fn hline(&mut self, y: u16, x: u16, length: u16) {
        let rule = String::from(ACS_HLINE).repeat(length.into());
        self.mvprint(y, x, Line::styled(rule, WEEKDAY_HEADER_STYLE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{PickerInput, PickerOutput};
    use crate::selection::DateRange;
    use ratatui::style::{Color, Modifier};
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

    fn render(picker: &mut Picker) -> Buffer {
        let area = Rect::new(0, 0, 40, 24);
        let mut buffer = Buffer::empty(area);
        PickerWidget.render(area, &mut buffer, picker);
        buffer
    }

    fn rows(buffer: &Buffer) -> Vec<String> {
        let width = usize::from(buffer.area.width);
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect())
            .collect()
    }

    /// Returns the screen position of the first occurrence of `needle`
    fn find(buffer: &Buffer, needle: &str) -> Option<(u16, u16)> {
        for (row, y) in rows(buffer).iter().zip(0u16..) {
            if let Some(byte_pos) = row.find(needle) {
                let x = row[..byte_pos].chars().count();
                return Some((u16::try_from(x).unwrap(), y));
            }
        }
        None
    }

    #[test]
    fn test_layout() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), presets());
        let buffer = render(&mut picker);
        let (_, title_y) = find(&buffer, TITLE).unwrap();
        let (_, year_y) = find(&buffer, "2025").unwrap();
        let (_, month_y) = find(&buffer, "October").unwrap();
        let (_, header_y) = find(&buffer, HEADER).unwrap();
        assert_eq!(year_y, title_y + 1);
        assert_eq!(month_y, year_y + 1);
        assert_eq!(header_y, month_y + 2);
        let (_, first_y) = find(&buffer, "  1   2   3   4 ").unwrap();
        assert_eq!(first_y, header_y + 2);
        let (_, week_y) = find(&buffer, "  5   6   7   8   9  10  11 ").unwrap();
        assert_eq!(week_y, first_y + 1);
        assert!(find(&buffer, "[15]").is_some());
        assert!(find(&buffer, PRESETS_TITLE).is_some());
        assert!(find(&buffer, "1  Last 7 Days").is_some());
        assert!(find(&buffer, "2  Last 30 Days").is_some());
    }

    #[test]
    fn test_no_presets() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), Vec::new());
        let buffer = render(&mut picker);
        assert!(find(&buffer, PRESETS_TITLE).is_none());
        assert!(find(&buffer, "October").is_some());
    }

    #[test]
    fn test_day_styles() {
        let range = DateRange::new(date!(2025 - 10 - 09), date!(2025 - 10 - 14)).unwrap();
        let mut picker = Picker::new(date!(2025 - 10 - 20), Vec::new()).with_range(range);
        let buffer = render(&mut picker);
        let (x, y) = find(&buffer, " 11 ").unwrap();
        assert_eq!(buffer[(x + 1, y)].fg, Color::LightRed);
        assert_eq!(buffer[(x + 1, y)].bg, Color::Blue);
        let (x, y) = find(&buffer, " 13 ").unwrap();
        assert_eq!(buffer[(x + 1, y)].bg, Color::Blue);
        let (x, y) = find(&buffer, " 18 ").unwrap();
        assert_eq!(buffer[(x + 1, y)].fg, Color::DarkGray);
        assert_eq!(buffer[(x + 1, y)].bg, Color::Black);
        let (x, y) = find(&buffer, " 15 ").unwrap();
        assert_eq!(buffer[(x + 1, y)].fg, Color::White);
        assert_eq!(buffer[(x + 1, y)].bg, Color::Black);
    }

    #[test]
    fn test_today_is_underlined() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), Vec::new());
        picker.handle_input(PickerInput::Right);
        let buffer = render(&mut picker);
        let (x, y) = find(&buffer, " 15 ").unwrap();
        let today = &buffer[(x + 1, y)];
        assert!(today.modifier.contains(Modifier::UNDERLINED));
        assert!(!today.modifier.contains(Modifier::BOLD));
        let (x, y) = find(&buffer, "[16]").unwrap();
        let cursor = &buffer[(x + 1, y)];
        assert!(cursor.modifier.contains(Modifier::BOLD));
        assert!(!cursor.modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_hover_preview_style() {
        let mut picker = Picker::new(date!(2025 - 10 - 06), Vec::new());
        picker.handle_input(PickerInput::Select);
        picker.handle_input(PickerInput::Right);
        picker.handle_input(PickerInput::Right);
        let buffer = render(&mut picker);
        let (x, y) = find(&buffer, "  7 ").unwrap();
        assert_eq!(buffer[(x + 2, y)].bg, Color::Cyan);
        let (x, y) = find(&buffer, "[ 8]").unwrap();
        assert_eq!(buffer[(x + 2, y)].bg, Color::Cyan);
        let (x, y) = find(&buffer, "  9 ").unwrap();
        assert_eq!(buffer[(x + 2, y)].bg, Color::Black);
    }

    #[test]
    fn test_mouse_click_on_rendered_days() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), presets());
        let buffer = render(&mut picker);
        let (x, y) = find(&buffer, "  6 ").unwrap();
        assert_eq!(picker.click_at(x + 2, y), PickerOutput::Ok);
        assert_eq!(picker.selection.start(), Some(date!(2025 - 10 - 06)));
        let buffer = render(&mut picker);
        let (x, y) = find(&buffer, " 10 ").unwrap();
        let range = DateRange::new(date!(2025 - 10 - 06), date!(2025 - 10 - 10)).unwrap();
        assert_eq!(picker.click_at(x + 1, y), PickerOutput::Done(range));
    }

    #[test]
    fn test_mouse_click_on_weekend_is_invalid() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), Vec::new());
        let buffer = render(&mut picker);
        let (x, y) = find(&buffer, " 12 ").unwrap();
        assert_eq!(picker.click_at(x + 1, y), PickerOutput::Invalid);
        assert_eq!(picker.selection.start(), None);
    }

    #[test]
    fn test_mouse_click_on_nav() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), Vec::new());
        let buffer = render(&mut picker);
        let (x, y) = find(&buffer, "›").unwrap();
        assert_eq!(picker.click_at(x, y), PickerOutput::Ok);
        assert_eq!(picker.view.month(), Month::November);
        let buffer = render(&mut picker);
        assert!(find(&buffer, "November").is_some());
        let (x, y) = find(&buffer, "«").unwrap();
        assert_eq!(picker.click_at(x, y), PickerOutput::Ok);
        assert_eq!(picker.view.year(), 2024);
    }

    #[test]
    fn test_mouse_click_on_preset() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), presets());
        let buffer = render(&mut picker);
        let (_, y) = find(&buffer, "Last 7 Days").unwrap();
        let (x, _) = find(&buffer, PRESETS_TITLE).unwrap();
        let PickerOutput::Done(range) = picker.click_at(x + 20, y) else {
            panic!("Clicking a preset should complete a range");
        };
        assert_eq!(range.start(), date!(2025 - 10 - 08));
        assert_eq!(range.end(), date!(2025 - 10 - 15));
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let mut picker = Picker::new(date!(2025 - 10 - 15), presets());
        let area = Rect::new(0, 0, 10, 4);
        let mut buffer = Buffer::empty(area);
        PickerWidget.render(area, &mut buffer, &mut picker);
    }
}
