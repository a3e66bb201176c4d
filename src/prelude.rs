//! Convenience re-exports of commonly used types.
//!
//! `use shelf::prelude::*;` brings in everything needed to configure and run
//! shelf as a library.

pub use crate::catalog::{CandidateSource, CatalogError, FileSource, HttpSource, StaticSource};
pub use crate::options::{ShelfOptions, ShelfOptionsBuilder};
pub use crate::output::ShelfOutput;
pub use crate::tui::{Event, event::Action};
pub use crate::*;
pub use std::sync::Arc;
