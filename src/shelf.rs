//! Module containing shelf's entry point
use std::sync::Arc;

use color_eyre::eyre::{self, OptionExt, Result};
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Handle;
use tokio::task::{JoinHandle, block_in_place};

use crate::catalog::{self, CandidateSource, FileSource, HttpSource};
use crate::tui::{App, Size, Tui};
use crate::{ShelfOptions, ShelfOutput};

/// Main entry point for running shelf
pub struct Shelf<Backend = CrosstermBackend<std::io::Stderr>>
where
    Backend: ratatui::backend::Backend,
    Backend::Error: Send + Sync + 'static,
{
    app: App,
    tui: Option<Tui<Backend>>,
    height: Size,
    source: Option<Box<dyn CandidateSource>>,
    fetch: Option<JoinHandle<()>>,
}

impl Shelf {
    /// Run shelf until the user quits
    ///
    /// # Params
    ///
    /// - options: the options that control how shelf behaves
    /// - source: where the candidates come from. If None is given, shelf reads
    ///   `--catalog` when set and fetches `--url` otherwise.
    ///
    /// # Returns
    ///
    /// The query and every candidate committed during the session.
    pub fn run_with(options: ShelfOptions, source: Option<Box<dyn CandidateSource>>) -> Result<ShelfOutput> {
        trace!("running shelf");
        let task = async {
            let mut shelf = Self::init(options, source)?;
            shelf.init_tui()?;
            shelf.start();
            shelf.enter()?;
            shelf.run().await?;
            eyre::Ok(shelf.output())
        };

        let output = if let Ok(handle) = Handle::try_current() {
            block_in_place(|| handle.block_on(task))?
        } else {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(task)?
        };
        debug!("output: {output:?}");
        Ok(output)
    }

    /// Initialize the TUI on stderr, but do not enter it yet
    pub fn init_tui(&mut self) -> Result<()> {
        let mut tui = Tui::new_with_height(CrosstermBackend::new(std::io::stderr()), self.height)?;
        tui.mouse = !self.app.options.no_mouse;
        self.tui = Some(tui);
        Ok(())
    }
}

impl<Backend: ratatui::backend::Backend + 'static> Shelf<Backend>
where
    Backend::Error: Send + Sync + 'static,
{
    /// Initialize shelf, without starting anything yet
    pub fn init(options: ShelfOptions, source: Option<Box<dyn CandidateSource>>) -> Result<Self> {
        let height = Size::try_from(options.height.as_str())?;
        let theme = Arc::new(crate::theme::ColorTheme::init_from_options(&options));
        let source = source.unwrap_or_else(|| default_source(&options));
        debug!("catalog source: {source}");
        let app = App::from_options(options, theme);
        Ok(Self {
            app,
            tui: None,
            height,
            source: Some(source),
            fetch: None,
        })
    }

    /// Initialize the TUI with a caller-provided instance.
    ///
    /// Use this instead of [`init_tui()`](Shelf::init_tui) when you need a
    /// non-default backend (e.g. `TestBackend` in tests).
    pub fn init_tui_with(&mut self, tui: Tui<Backend>) {
        self.tui = Some(tui);
    }

    /// Spawn the catalog fetch
    ///
    /// Must be called from within a tokio runtime, after the TUI is initialized.
    /// The fetch only ever runs once; later calls do nothing.
    pub fn start(&mut self) {
        let (Some(source), Some(tui)) = (self.source.take(), self.tui.as_ref()) else {
            return;
        };
        self.fetch = Some(catalog::spawn_fetch(source, tui.event_tx.clone()));
    }

    /// Enter the TUI
    pub fn enter(&mut self) -> Result<()> {
        debug!("Entering TUI");
        self.tui
            .as_mut()
            .ok_or_eyre("TUI needs to be initialized using Shelf::init_tui before entering")?
            .enter()
    }

    /// Returns a shared reference to the application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Returns a mutable reference to the application state.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Returns a shared reference to the TUI, if initialized.
    pub fn tui_ref(&self) -> Option<&Tui<Backend>> {
        self.tui.as_ref()
    }

    /// Returns a mutable reference to the TUI, if initialized.
    pub fn tui_mut(&mut self) -> Option<&mut Tui<Backend>> {
        self.tui.as_mut()
    }

    /// Returns mutable references to both the app and the TUI simultaneously.
    ///
    /// `app.handle_event(tui, ...)` needs disjoint mutable borrows of both.
    pub fn app_and_tui(&mut self) -> Option<(&mut App, &mut Tui<Backend>)> {
        self.tui.as_mut().map(|tui| (&mut self.app, tui))
    }

    /// Returns true if the user quit
    pub fn should_quit(&self) -> bool {
        self.app.should_quit
    }

    /// Process a single event loop iteration.
    ///
    /// Returns `Ok(true)` if shelf should quit, `Ok(false)` to continue.
    pub async fn tick(&mut self) -> Result<bool> {
        let tui = self
            .tui
            .as_mut()
            .ok_or_eyre("TUI should be initialized before the event loop can start")?;
        let evt = tui.next().await.ok_or_eyre("Could not acquire next event")?;
        self.app.handle_event(tui, &evt)?;
        Ok(self.app.should_quit)
    }

    /// Run the event loop on the current task until shelf quits.
    pub async fn run(&mut self) -> Result<()> {
        trace!("Starting event loop");
        loop {
            if self.tick().await? {
                break Ok(());
            }
        }
    }

    /// Capture `self` and extract the output
    pub fn output(mut self) -> ShelfOutput {
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        let committed = std::mem::take(&mut self.app.committed);
        ShelfOutput {
            query: self.app.controller.query().to_owned(),
            is_abort: committed.is_empty(),
            committed,
        }
    }
}

fn default_source(options: &ShelfOptions) -> Box<dyn CandidateSource> {
    match &options.catalog {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpSource::new(options.url.as_str())),
    }
}
