use std::sync::Arc;

use crate::options::ShelfOptions;
use crate::theme::ColorTheme;

/// Trait for shelf TUI widgets
///
/// Widgets hold presentation settings only. The state they draw is owned by the
/// controller and handed to them on every render.
pub trait ShelfWidget: Sized {
    /// Create a widget from options and theme
    fn from_options(options: &ShelfOptions, theme: Arc<ColorTheme>) -> Self;
}
