//! Terminal UI components and rendering.
//!
//! The [`App`] widget wires the query input, the result list and the selection
//! notice around the [`Autocomplete`](crate::Autocomplete) controller. [`Tui`]
//! owns the terminal and pumps crossterm events into the event channel.

use std::num::ParseIntError;

pub use app::App;
pub use backend::Tui;
pub use event::Event;
use thiserror::Error;
pub use widget::ShelfWidget;

mod app;
mod backend;
/// Event handling and action definitions
pub mod event;
/// Query input display and editing
pub mod input;
/// Selection notice overlay
pub mod notice;
/// Result list display and scrolling
pub mod result_list;
/// Widget rendering utilities
pub mod widget;

/// Represents a size value, either as a percentage or fixed value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    /// Size as a percentage (0-100)
    Percent(u16),
    /// Fixed size in terminal cells
    Fixed(u16),
}

impl Size {
    /// Resolves the size against a total number of cells
    pub fn resolve(self, total: u16) -> u16 {
        match self {
            Size::Fixed(n) => n.min(total),
            Size::Percent(p) => (u32::from(total) * u32::from(p) / 100) as u16,
        }
    }
}

/// Error type for parsing size values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SizeParseError {
    /// Error parsing the size string
    #[error("Error parsing {0}: {1:?}")]
    ParseError(String, ParseIntError),
    /// Percentage value exceeds 100
    #[error("Invalid percentage {0}")]
    InvalidPercent(u16),
}

impl TryFrom<&str> for Size {
    type Error = SizeParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parse = |s: &str| {
            s.parse::<u16>()
                .map_err(|e| SizeParseError::ParseError(value.to_string(), e))
        };
        match value.strip_suffix('%') {
            Some(percent) => {
                let percent = parse(percent)?;
                if percent > 100 {
                    return Err(SizeParseError::InvalidPercent(percent));
                }
                Ok(Self::Percent(percent))
            }
            None => Ok(Self::Fixed(parse(value)?)),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::Percent(100)
    }
}
