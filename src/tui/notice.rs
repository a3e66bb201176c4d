use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use unicode_display_width::width as display_width;

use crate::tui::widget::ShelfWidget;
use crate::{Candidate, ShelfOptions, theme::ColorTheme};

const HINT: &str = "press enter";

/// Modal notification shown after a selection is committed
pub struct Notice {
    /// The candidate being reported, if the notice is open
    pub shown: Option<Arc<Candidate>>,
    theme: Arc<ColorTheme>,
}

impl ShelfWidget for Notice {
    fn from_options(_options: &ShelfOptions, theme: Arc<ColorTheme>) -> Self {
        Self { shown: None, theme }
    }
}

impl Notice {
    /// Opens the notice for `candidate`
    pub fn show(&mut self, candidate: Arc<Candidate>) {
        self.shown = Some(candidate);
    }

    /// Closes the notice, returning what it was showing
    pub fn acknowledge(&mut self) -> Option<Arc<Candidate>> {
        self.shown.take()
    }

    /// Whether the notice is open
    pub fn is_shown(&self) -> bool {
        self.shown.is_some()
    }

    /// The notice text
    pub fn message(candidate: &Candidate) -> String {
        format!("You selected {}", candidate.label)
    }

    /// Draws the notice centered over `area`
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let Some(candidate) = &self.shown else {
            return;
        };
        let message = Self::message(candidate);
        let message_width = cells(&message);
        let width = message_width
            .saturating_add(4)
            .max(cells(HINT) + 4)
            .min(area.width);
        let inner_width = width.saturating_sub(2).max(1);
        let lines = message_width.div_ceil(inner_width).max(1);
        let height = lines.saturating_add(2).min(area.height);

        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(row);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title_bottom(Line::from(HINT).alignment(Alignment::Right));
        Clear.render(popup, buf);
        Paragraph::new(message)
            .style(self.theme.notice)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(popup, buf);
    }
}

/// Display width of `text`, saturating at `u16::MAX`
fn cells(text: &str) -> u16 {
    u16::try_from(display_width(text)).unwrap_or(u16::MAX)
}
