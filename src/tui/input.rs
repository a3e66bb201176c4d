use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_display_width::width as display_width;

use crate::tui::event::Action;
use crate::tui::widget::ShelfWidget;
use crate::{ShelfOptions, theme::ColorTheme};

const SPINNERS_UNICODE: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Status information to display in the input's title
#[derive(Default, Debug, Clone, Copy)]
pub struct StatusInfo {
    /// Number of results for the current query
    pub matched: usize,
    /// Size of the candidate set
    pub total: usize,
    /// Whether the catalog is still being fetched
    pub loading: bool,
    /// Heartbeats received so far, drives the spinner
    pub ticks: usize,
}

impl StatusInfo {
    /// Build the title string: spinner while loading, then `matched/total`
    pub fn title(&self) -> String {
        if self.loading {
            format!("{} loading", SPINNERS_UNICODE[self.ticks % SPINNERS_UNICODE.len()])
        } else {
            format!("{}/{}", self.matched, self.total)
        }
    }
}

/// The query input
///
/// The query text itself is owned by the controller: editing actions are
/// turned into the new text with [`Input::apply`], and rendering reads the
/// current query.
pub struct Input {
    /// Prompt displayed before the query
    pub prompt: String,
    /// Text displayed while the query is empty
    pub placeholder: String,
    /// Status displayed as the title
    pub status: StatusInfo,
    theme: Arc<ColorTheme>,
}

impl ShelfWidget for Input {
    fn from_options(options: &ShelfOptions, theme: Arc<ColorTheme>) -> Self {
        Self {
            prompt: options.prompt.clone(),
            placeholder: options.placeholder.clone(),
            status: StatusInfo {
                loading: true,
                ..Default::default()
            },
            theme,
        }
    }
}

impl Input {
    /// Computes the query resulting from an editing action
    ///
    /// Returns `None` when the action is not an edit.
    pub fn apply(action: &Action, query: &str) -> Option<String> {
        match action {
            Action::AddChar(c) => {
                let mut res = query.to_owned();
                res.push(*c);
                Some(res)
            }
            Action::BackwardDeleteChar => {
                let mut res = query.to_owned();
                res.pop();
                Some(res)
            }
            Action::UnixLineDiscard => Some(String::new()),
            Action::UnixWordRubout => Some(delete_backward_to_whitespace(query).to_owned()),
            _ => None,
        }
    }

    /// Cursor column, relative to the inner area
    pub fn cursor_pos(&self, query: &str) -> u16 {
        (display_width(&self.prompt) + display_width(query))
            .try_into()
            .unwrap_or(u16::MAX)
    }

    /// Draws the prompt and the query, or the placeholder
    pub fn render(&self, query: &str, area: Rect, buf: &mut Buffer) {
        let title = Line::from(self.status.title())
            .style(if self.status.loading { self.theme.spinner } else { self.theme.info })
            .alignment(Alignment::Left);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title_top(title);

        let text = if query.is_empty() {
            Span::styled(self.placeholder.as_str(), self.theme.placeholder)
        } else {
            Span::styled(query, self.theme.query)
        };
        let line = Line::from(vec![Span::styled(self.prompt.as_str(), self.theme.prompt), text]);
        Paragraph::new(line).block(block).style(self.theme.normal).render(area, buf);
    }
}

/// Drops the last word of `text`, along with the whitespace after it
fn delete_backward_to_whitespace(text: &str) -> &str {
    let trimmed = text.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(idx) => {
            let ws_len = trimmed[idx..].chars().next().map_or(1, char::len_utf8);
            &trimmed[..idx + ws_len]
        }
        None => "",
    }
}
