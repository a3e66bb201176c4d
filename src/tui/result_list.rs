use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget};
use unicode_display_width::width as display_width;

use crate::tui::widget::ShelfWidget;
use crate::{DisplayContext, MatchedCandidate, ShelfOptions, theme::ColorTheme};

const CURSOR_ICON: &str = "> ";

/// The panel listing the filtered results
///
/// The list keeps its own scroll offset. The results and the active index
/// belong to the controller and are passed in on render.
pub struct ResultList {
    /// Index of the first visible result
    pub offset: usize,
    /// Number of rows available, as of the last render
    pub height: u16,
    /// Maximum number of rows to show
    pub max_rows: u16,
    /// Inner area of the last render, used to map mouse positions
    pub area: Option<Rect>,
    len: usize,
    theme: Arc<ColorTheme>,
}

impl ShelfWidget for ResultList {
    fn from_options(options: &ShelfOptions, theme: Arc<ColorTheme>) -> Self {
        Self {
            offset: 0,
            height: options.max_rows,
            max_rows: options.max_rows,
            area: None,
            len: 0,
            theme,
        }
    }
}

impl ResultList {
    /// Total height of the panel for `len` results, borders included
    pub fn panel_height(&self, len: usize) -> u16 {
        let rows = len.min(self.max_rows as usize) as u16;
        if rows == 0 { 0 } else { rows + 2 }
    }

    /// Scrolls back to the top, after the results changed
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Scrolls the minimum amount needed for `index` to be visible
    pub fn reveal(&mut self, index: usize) {
        let height = self.height.max(1) as usize;
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + height {
            self.offset = index + 1 - height;
        }
        trace!("reveal {index}: offset is now {}", self.offset);
    }

    /// Maps a screen position to the result index drawn there
    pub fn index_at(&self, pos: Position) -> Option<usize> {
        let area = self.area?;
        if !area.contains(pos) {
            return None;
        }
        let index = self.offset + (pos.y - area.y) as usize;
        (index < self.len).then_some(index)
    }

    /// Draws the results into `area`
    pub fn render(&mut self, results: &[MatchedCandidate], active: Option<usize>, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).border_style(self.theme.border);
        let inner = block.inner(area);
        self.area = Some(inner);
        self.height = inner.height;
        self.len = results.len();

        Widget::render(Clear, area, buf);
        if inner.height == 0 {
            // squeezed down to its borders, keep the scroll offset for later
            trace!("result panel has no room for rows");
            Widget::render(block, area, buf);
            return;
        }

        let height = inner.height as usize;
        self.offset = self.offset.min(results.len().saturating_sub(height));
        if let Some(current) = active {
            if current < self.offset {
                self.offset = current;
            } else if self.offset + height <= current {
                self.offset = current + 1 - height;
            }
        }

        let theme = &self.theme;
        let width = inner.width as usize;
        let list = List::new(
            results
                .iter()
                .enumerate()
                .skip(self.offset)
                .take(height)
                .map(|(idx, matched)| {
                    let is_current = Some(idx) == active;
                    let base_style = if is_current { theme.current } else { theme.normal };
                    let label = matched.candidate.display(DisplayContext {
                        matches: matched.range,
                        base_style,
                        matched_style: if is_current { theme.current_match } else { theme.matched },
                    });

                    let mut spans: Vec<Span> = Vec::with_capacity(3 + label.spans.len());
                    spans.push(Span::styled(
                        if is_current {
                            CURSOR_ICON.to_owned()
                        } else {
                            " ".repeat(CURSOR_ICON.len())
                        },
                        theme.cursor,
                    ));
                    spans.extend(label.spans);

                    let image = &matched.candidate.image_url;
                    let used = CURSOR_ICON.len() + display_width(&matched.candidate.label) as usize;
                    let image_width = display_width(image) as usize;
                    if !image.is_empty() && used + 1 + image_width <= width {
                        spans.push(Span::styled(" ".repeat(width - used - image_width), base_style));
                        spans.push(Span::styled(image.as_str(), base_style.patch(theme.image)));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect::<Vec<ListItem>>(),
        )
        .style(theme.normal);

        Widget::render(block, area, buf);
        StatefulWidget::render(
            list,
            inner,
            buf,
            &mut ListState::default().with_selected(active.and_then(|current| current.checked_sub(self.offset))),
        );
    }
}
