use crate::calendar::popup_area;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Margin, Rect},
    style::Style,
    text::Text,
    widgets::{Block, Clear, Paragraph, Widget},
};

static TITLE: &str = " Commands ";

static TEXT: &[&str] = &[
    "ENTER, SPACE, o     Open or close the picker",
    "q, ESC              Close the picker / quit",
    "",
    "In the picker:",
    "h j k l, arrows     Move the cursor",
    "ENTER, SPACE        Pick the date under the cursor",
    "p, PAGE UP          Previous month",
    "n, PAGE DOWN        Next month",
    "P / N               Previous / next year",
    "t, HOME             Jump to today",
    "1-9                 Quick-select a preset",
    "",
    "?                   Show this help",
    "",
    "Press the Any Key to dismiss.",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from_iter(TEXT.iter().copied());
        // Border plus one blank column on each side
        let width = u16::try_from(text.width()).map_or(u16::MAX, |w| w.saturating_add(4));
        let height = u16::try_from(text.height()).map_or(u16::MAX, |h| h.saturating_add(2));
        let popup = popup_area(area, width, height);
        Clear.render(popup, buf);
        let block = Block::bordered()
            .title(TITLE)
            .title_alignment(Alignment::Center)
            .style(self.0);
        let inner = block.inner(popup).inner(Margin::new(1, 0));
        block.render(popup, buf);
        Paragraph::new(text).style(self.0).render(inner, buf);
    }
}
