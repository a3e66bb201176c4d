//! Shelf is an autocomplete search widget for the terminal.
//!
//! It fetches a product catalog once, filters it by case-insensitive substring
//! as the user types, and lets the user pick a result with the keyboard or the
//! mouse. Shelf can be used as a library or as a command-line tool.
//!
//! # Examples
//!
//! ```no_run
//! use shelf::prelude::*;
//!
//! let options = ShelfOptionsBuilder::default()
//!     .height(String::from("40%"))
//!     .once(true)
//!     .build()
//!     .unwrap();
//!
//! let catalog = vec![
//!     Candidate::new(1, "Red Shirt", "https://example.com/red-shirt.png"),
//!     Candidate::new(2, "Blue Shirt", "https://example.com/blue-shirt.png"),
//! ];
//!
//! let output = Shelf::run_with(options, Some(Box::new(StaticSource::new(catalog)))).unwrap();
//! for candidate in output.committed {
//!     println!("{}", candidate.label);
//! }
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub use crate::candidate::{Candidate, DisplayContext};
pub use crate::controller::{Autocomplete, Effect, NavKey};
pub use crate::matcher::{MatchedCandidate, Matcher};
pub use crate::options::ShelfOptions;
pub use crate::output::ShelfOutput;
pub use crate::shelf::Shelf;

pub mod binds;
pub mod candidate;
pub mod catalog;
pub mod controller;
pub mod matcher;
pub mod options;
mod output;
pub mod prelude;
mod shelf;
pub mod theme;
pub mod tui;

#[cfg(feature = "cli")]
pub mod completions;
