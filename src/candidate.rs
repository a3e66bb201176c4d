//! Searchable candidates and how they are drawn.

use std::fmt::Display;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// One searchable item of the catalog
///
/// Candidates are immutable once fetched and are shared as `Arc<Candidate>`
/// between the full set and the filtered results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Unique identifier, as given by the catalog
    pub id: u64,
    /// The text displayed and matched against the query
    pub label: String,
    /// Thumbnail reference
    pub image_url: String,
}

impl Candidate {
    /// Creates a new candidate
    pub fn new(id: u64, label: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            image_url: image_url.into(),
        }
    }

    /// Renders the label as a styled `Line`, highlighting the matched range
    pub fn display(&self, context: DisplayContext) -> Line<'_> {
        context.to_line(&self.label)
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Context information for displaying a candidate
#[derive(Default, Debug, Clone, Copy)]
pub struct DisplayContext {
    /// Matched character range `(start, end)` in the label, if any
    pub matches: Option<(usize, usize)>,
    /// The style to apply to non-matched portions
    pub base_style: Style,
    /// The style to apply to the matched portion
    pub matched_style: Style,
}

impl DisplayContext {
    /// Converts the context and text into a styled `Line` with the match highlighted
    pub fn to_line(self, text: &str) -> Line<'_> {
        match self.matches {
            Some((start, end)) if end > start => {
                let mut chars = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
                let start_byte = chars.by_ref().nth(start).unwrap_or(text.len());
                let end_byte = chars.nth(end - start - 1).unwrap_or(text.len());

                let mut res = Line::default();
                res.push_span(Span::styled(&text[..start_byte], self.base_style));
                res.push_span(Span::styled(
                    &text[start_byte..end_byte],
                    self.base_style.patch(self.matched_style),
                ));
                res.push_span(Span::styled(&text[end_byte..], self.base_style));
                res
            }
            _ => Line::from(vec![Span::styled(text, self.base_style)]),
        }
    }
}
