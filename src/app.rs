use crate::calendar::{Picker, PickerInput, PickerOutput, PickerWidget};
use crate::config::Preset;
use crate::format::{DateFormat, PLACEHOLDER};
use crate::help::Help;
use crate::selection::{DateRange, Outcome};
use crate::theme::{summary::*, BASE_STYLE, HINT_STYLE, TITLE_STYLE};
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Position, Rect},
    text::{Line, Text},
    widgets::{Block, Paragraph, StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

static TITLE: &str = "Weekday Date Range Picker";

static WEEKENDS_HEADING: &str = "Weekend Dates in Selected Range:";

static SUMMARY_HINT: &str = "ENTER: pick a range   ?: help   q: quit";

static PICKER_HINT: &str = "ENTER: pick   1-9: presets   ESC: close   ?: help";

/// Width of the date-range field, borders included
const FIELD_WIDTH: u16 = 32;

/// Width of the column in which the weekend dates are listed
const LIST_WIDTH: u16 = 34;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    today: Date,
    date_format: DateFormat,
    presets: Vec<Preset>,
    outcome: Option<Outcome>,
    state: AppState,
    /// Where the date-range field was last drawn, for routing mouse clicks
    field_area: Rect,
}

impl App {
    pub(crate) fn new(today: Date, date_format: DateFormat, presets: Vec<Preset>) -> App {
        App {
            today,
            date_format,
            presets,
            outcome: None,
            state: AppState::Summary,
            field_area: Rect::default(),
        }
    }

    /// Start with `range` already chosen
    pub(crate) fn with_range(mut self, range: DateRange) -> App {
        self.outcome = Some(range.outcome());
        self
    }

    /// Start with the picker open and `start` picked as the start of a range
    pub(crate) fn with_pending_start(mut self, start: Date) -> App {
        self.state = AppState::Picking(self.new_picker().with_pending_start(start));
        self
    }

    /// Runs the event loop until the user quits and returns the range that
    /// was chosen, if any
    pub(crate) fn run<B: Backend>(
        mut self,
        terminal: &mut Terminal<B>,
    ) -> io::Result<Option<Outcome>> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(self.outcome)
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        let event = read()?;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) = event
        {
            if !self.handle_mouse(kind, column, row) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Summary => match key {
                KeyCode::Enter | KeyCode::Char(' ' | 'o') => {
                    self.open_picker();
                    true
                }
                KeyCode::Char('?') => {
                    self.show_help();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Picking(picker) => {
                let input = match key {
                    KeyCode::Char('q' | 'o') | KeyCode::Esc => {
                        self.close_picker();
                        return true;
                    }
                    KeyCode::Char('?') => {
                        self.show_help();
                        return true;
                    }
                    KeyCode::Char('h') | KeyCode::Left => PickerInput::Left,
                    KeyCode::Char('l') | KeyCode::Right => PickerInput::Right,
                    KeyCode::Char('k') | KeyCode::Up => PickerInput::Up,
                    KeyCode::Char('j') | KeyCode::Down => PickerInput::Down,
                    KeyCode::Char('p') | KeyCode::PageUp => PickerInput::PreviousMonth,
                    KeyCode::Char('n') | KeyCode::PageDown => PickerInput::NextMonth,
                    KeyCode::Char('P') => PickerInput::PreviousYear,
                    KeyCode::Char('N') => PickerInput::NextYear,
                    KeyCode::Char('t') | KeyCode::Home => PickerInput::Today,
                    KeyCode::Enter | KeyCode::Char(' ') => PickerInput::Select,
                    KeyCode::Char(c) => match preset_index(c) {
                        Some(i) => PickerInput::Preset(i),
                        None => return false,
                    },
                    _ => return false,
                };
                let output = picker.handle_input(input);
                self.handle_picker_output(output)
            }
            AppState::Helping(_) => {
                self.dismiss_help();
                true
            }
            AppState::Quitting => false,
        }
    }

    // Returns `false` if the click was not somewhere it could do anything
    fn handle_mouse(&mut self, kind: MouseEventKind, x: u16, y: u16) -> bool {
        let left_click = kind == MouseEventKind::Down(MouseButton::Left);
        let on_field = self.field_area.contains(Position::new(x, y));
        match &mut self.state {
            AppState::Summary => {
                if left_click && on_field {
                    self.open_picker();
                }
                true
            }
            AppState::Picking(_) if left_click && on_field => {
                self.close_picker();
                true
            }
            AppState::Picking(picker) => match kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    let output = picker.click_at(x, y);
                    self.handle_picker_output(output)
                }
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    picker.hover_at(x, y);
                    true
                }
                _ => true,
            },
            AppState::Helping(_) => {
                if matches!(kind, MouseEventKind::Down(_)) {
                    self.dismiss_help();
                }
                true
            }
            AppState::Quitting => true,
        }
    }

    fn handle_picker_output(&mut self, output: PickerOutput) -> bool {
        match output {
            PickerOutput::Ok => true,
            PickerOutput::Invalid => false,
            PickerOutput::Done(range) => {
                let outcome = range.outcome();
                tracing::info!(
                    start = %range.start(),
                    end = %range.end(),
                    weekends = outcome.weekends.len(),
                    "date range chosen"
                );
                self.outcome = Some(outcome);
                self.state = AppState::Summary;
                true
            }
        }
    }

    fn new_picker(&self) -> Picker {
        let picker = Picker::new(self.today, self.presets.clone());
        match &self.outcome {
            Some(outcome) => picker.with_range(outcome.range),
            None => picker,
        }
    }

    fn open_picker(&mut self) {
        self.state = AppState::Picking(self.new_picker());
    }

    fn close_picker(&mut self) {
        self.state = AppState::Summary;
    }

    fn show_help(&mut self) {
        let previous = std::mem::replace(&mut self.state, AppState::Summary);
        self.state = AppState::Helping(match previous {
            AppState::Picking(picker) => Some(picker),
            _ => None,
        });
    }

    fn dismiss_help(&mut self) {
        let previous = std::mem::replace(&mut self.state, AppState::Summary);
        if let AppState::Helping(Some(picker)) = previous {
            self.state = AppState::Picking(picker);
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn field_text(&self) -> Line<'static> {
        match &self.outcome {
            Some(Outcome { range, .. }) => Line::styled(
                self.date_format.format_range(range.start(), range.end()),
                FIELD_STYLE,
            ),
            None => Line::styled(PLACEHOLDER, PLACEHOLDER_STYLE),
        }
    }

    fn render_weekends(&self, area: Rect, buf: &mut Buffer) {
        let Some(outcome) = self.outcome.as_ref().filter(|o| !o.weekends.is_empty()) else {
            return;
        };
        let [area] = Layout::horizontal([LIST_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let room = usize::from(area.height.saturating_sub(1));
        let mut lines = vec![Line::styled(WEEKENDS_HEADING, TITLE_STYLE)];
        let qty = outcome.weekends.len();
        let shown = if qty > room {
            room.saturating_sub(1)
        } else {
            qty
        };
        for &d in outcome.weekends.iter().take(shown) {
            let text = format!("  • {}", self.date_format.format(d));
            lines.push(Line::styled(text, WEEKEND_LIST_STYLE));
        }
        if shown < qty {
            let text = format!("  … and {} more", qty - shown);
            lines.push(Line::styled(text, HINT_STYLE));
        }
        Paragraph::new(Text::from(lines)).render(area, buf);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [title_area, _, field_area, _, body_area, hint_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        Line::styled(TITLE, TITLE_STYLE)
            .centered()
            .render(title_area, buf);
        let [field_area] = Layout::horizontal([FIELD_WIDTH])
            .flex(Flex::Center)
            .areas(field_area);
        Paragraph::new(self.field_text())
            .block(Block::bordered().title(" Date range ").style(BASE_STYLE))
            .render(field_area, buf);
        self.field_area = field_area;
        let hint = match self.state {
            AppState::Picking(_) | AppState::Helping(Some(_)) => PICKER_HINT,
            _ => SUMMARY_HINT,
        };
        Line::styled(hint, HINT_STYLE)
            .centered()
            .render(hint_area, buf);
        match &mut self.state {
            AppState::Picking(picker) | AppState::Helping(Some(picker)) => {
                PickerWidget.render(body_area, buf, picker);
            }
            _ => self.render_weekends(body_area, buf),
        }
        if matches!(self.state, AppState::Helping(_)) {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Summary,
    Picking(Picker),
    /// The help overlay, along with the picker it was opened over, if any
    Helping(Option<Picker>),
    Quitting,
}

/// Maps the digit keys `1` through `9` to preset indices
fn preset_index(c: char) -> Option<usize> {
    let d = c.to_digit(10).filter(|&d| d != 0)?;
    usize::try_from(d - 1).ok()
}
