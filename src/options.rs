//! Configuration options for shelf.
//!
//! [`ShelfOptions`] is used both by the command line (through clap, behind the
//! `cli` feature) and by library users (through [`ShelfOptionsBuilder`]).

use derive_builder::Builder;

use crate::binds::KeyMap;
use crate::catalog::DEFAULT_CATALOG_URL;

/// shelf - autocomplete search over a product catalog
///
/// shelf fetches a catalog once, filters it as you type and prints the
/// products you pick.
#[derive(Builder)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "shelf", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct ShelfOptions {
    //  --- Catalog ---
    /// Endpoint returning the catalog as a JSON array
    ///
    /// Each entry needs an `id` (number), a `title` and an `image` (strings).
    /// Other fields are ignored, malformed entries are skipped.
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = DEFAULT_CATALOG_URL, help_heading = "Catalog", verbatim_doc_comment)
    )]
    pub url: String,

    /// Read the catalog from a JSON file instead of fetching it
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Catalog"))]
    pub catalog: Option<String>,

    //  --- Interface ---
    /// Start with the given query
    #[cfg_attr(feature = "cli", arg(long, short, default_value = "", help_heading = "Interface"))]
    pub query: String,

    /// Comma separated list of key bindings
    ///
    /// Format: `KEY:ACTION[+ACTION...]`
    /// Keys are `[ctrl-|alt-|shift-]name`, e.g. `ctrl-j`, `alt-up`, `tab`.
    /// Actions: abort, accept, add-char:C, backward-delete-char, down, ignore,
    /// redraw, unix-line-discard, unix-word-rubout, up
    ///
    /// Example: `shelf --bind 'tab:down,btab:up'`
    #[cfg_attr(
        feature = "cli",
        arg(long, short, help_heading = "Interface", verbatim_doc_comment)
    )]
    pub bind: Vec<String>,

    /// Disable mouse support
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub no_mouse: bool,

    /// Exit after the first selection is acknowledged
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub once: bool,

    //  --- Layout ---
    /// Height of shelf's window
    ///
    /// Can either be a row count or a percentage of the terminal height.
    /// Anything below 100% runs inline, under the cursor.
    #[cfg_attr(feature = "cli", arg(long, default_value = "100%", help_heading = "Layout"))]
    pub height: String,

    /// Maximum number of result rows shown at once
    #[cfg_attr(feature = "cli", arg(long, default_value = "10", help_heading = "Layout"))]
    pub max_rows: u16,

    /// Prompt shown in front of the query
    #[cfg_attr(feature = "cli", arg(long, default_value = "> ", help_heading = "Layout"))]
    pub prompt: String,

    /// Placeholder shown while the query is empty
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "Search products", help_heading = "Layout")
    )]
    pub placeholder: String,

    //  --- Display ---
    /// Change color theme
    ///
    /// Format: `[BASE][,COMPONENT:COLOR[:MODIFIER...]...]`
    ///
    /// Base themes: dark (default), light, 16, bw, none.
    /// Components: normal, matched, current, current_match, query, placeholder,
    /// spinner, info, prompt, cursor, image, border, notice. Append `_bg` to set
    /// the background.
    /// Colors are 0-255 or `#rrggbb`; modifiers are bold, underlined, dim,
    /// italic, reverse.
    ///
    /// `NO_COLOR` disables colors when this option is not set.
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Display", verbatim_doc_comment))]
    pub color: Option<String>,

    //  --- Scripting ---
    /// Print the id of the committed products instead of their title
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub print_id: bool,

    /// Pipe log output to a file
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub log_file: Option<String>,

    /// Generate shell completion script and output it to stdout
    #[cfg(feature = "cli")]
    #[cfg_attr(feature = "cli", arg(long, value_enum, help_heading = "Scripting"))]
    pub shell: Option<crate::completions::Shell>,

    /// The internal (parsed) keymap
    #[cfg_attr(feature = "cli", clap(skip))]
    pub keymap: KeyMap,
}

impl Default for ShelfOptions {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_CATALOG_URL),
            catalog: None,
            query: String::new(),
            bind: Vec::new(),
            no_mouse: false,
            once: false,
            height: String::from("100%"),
            max_rows: 10,
            prompt: String::from("> "),
            placeholder: String::from("Search products"),
            color: None,
            print_id: false,
            log_file: None,
            #[cfg(feature = "cli")]
            shell: None,
            keymap: KeyMap::default(),
        }
    }
}

impl ShelfOptionsBuilder {
    /// Builds the ShelfOptions from the builder
    pub fn build(&mut self) -> Result<ShelfOptions, ShelfOptionsBuilderError> {
        self.final_build().map(|opts| opts.build())
    }
}

impl ShelfOptions {
    /// Finalizes the options, computing the key map from `bind`
    pub fn build(mut self) -> Self {
        self.keymap = self.bind.iter().fold(KeyMap::default(), |mut res, part| {
            res.add_keymaps(part.split(','));
            res
        });
        self.max_rows = self.max_rows.max(1);
        self
    }
}
