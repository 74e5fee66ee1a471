use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) mod picker {
    use super::*;

    pub(crate) const NAV_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    pub(crate) const WEEKDAY_HEADER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    /// Weekends cannot be picked, so they are drawn dimmed
    pub(crate) const WEEKEND_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const SELECTED_STYLE: Style = Style::new().fg(Color::White).bg(Color::Blue);

    pub(crate) const SELECTED_WEEKEND_STYLE: Style = Style::new()
        .fg(Color::LightRed)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD);

    pub(crate) const HOVER_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

    pub(crate) const HOVER_WEEKEND_STYLE: Style = Style::new().fg(Color::Red).bg(Color::Cyan);

    pub(crate) const CURSOR_MODIFIER: Modifier = Modifier::BOLD;

    pub(crate) const TODAY_MODIFIER: Modifier = Modifier::UNDERLINED;

    pub(crate) const PRESET_KEY_STYLE: Style = BASE_STYLE.fg(Color::LightYellow);
}

pub(crate) mod summary {
    use super::*;

    pub(crate) const FIELD_STYLE: Style = BASE_STYLE;

    pub(crate) const PLACEHOLDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const WEEKEND_LIST_STYLE: Style = BASE_STYLE.fg(Color::LightRed);
}
