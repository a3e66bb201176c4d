use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use shelf::{
    Shelf,
    prelude::*,
    tui::{Event, Size, Tui, event::Action},
};

/// A test harness driving a [`Shelf<TestBackend>`].
///
/// Events are queued on the tui's channel and processed with the app's event
/// handler, like the real event loop does. The terminal pump is never started,
/// so no heartbeat or input from the real terminal gets in the way.
pub struct TestHarness {
    /// The Shelf instance backed by a TestBackend
    pub shelf: Shelf<TestBackend>,
    /// Runtime the catalog fetch is spawned on
    pub runtime: tokio::runtime::Runtime,
}

impl TestHarness {
    fn tui(&mut self) -> &mut Tui<TestBackend> {
        self.shelf.tui_mut().expect("the harness always initializes the tui")
    }

    /// Process all pending events, including the ones queued while processing
    pub fn tick(&mut self) -> Result<()> {
        loop {
            let mut events = Vec::new();
            while let Ok(event) = self.tui().event_rx.try_recv() {
                events.push(event);
            }
            if events.is_empty() {
                break;
            }
            for event in events {
                let _guard = self.runtime.enter();
                let (app, tui) = self.shelf.app_and_tui().ok_or_else(|| eyre!("no tui"))?;
                app.handle_event(tui, &event)?;
            }
        }
        Ok(())
    }

    /// Queue an event. Call `tick()` to process it.
    pub fn send(&mut self, event: Event) -> Result<()> {
        self.tui().event_tx.send(event)?;
        Ok(())
    }

    /// Send a key event and process it
    pub fn key(&mut self, key: KeyEvent) -> Result<()> {
        self.send(Event::Key(key))?;
        self.tick()
    }

    /// Send a character key event
    pub fn char(&mut self, c: char) -> Result<()> {
        self.key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    /// Send a ctrl-<c> key event
    pub fn ctrl(&mut self, c: char) -> Result<()> {
        self.key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    /// Type a string, one key event per character
    pub fn type_str(&mut self, s: &str) -> Result<()> {
        for c in s.chars() {
            self.char(c)?;
        }
        Ok(())
    }

    /// Send an action and process it
    pub fn action(&mut self, action: Action) -> Result<()> {
        self.send(Event::Action(action))?;
        self.tick()
    }

    /// Send a mouse event of `kind` at the given screen cell
    pub fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> Result<()> {
        self.send(Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))?;
        self.tick()
    }

    /// Left click at the given screen cell
    pub fn click(&mut self, column: u16, row: u16) -> Result<()> {
        self.mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    /// Wait until the catalog fetch has been delivered and processed
    pub fn wait_for_catalog(&mut self) -> Result<()> {
        let timeout = Duration::from_secs(5);
        let start = Instant::now();
        while !self.shelf.app().controller.is_loaded() {
            if start.elapsed() > timeout {
                return Err(eyre!("Timeout waiting for the catalog"));
            }
            std::thread::sleep(Duration::from_millis(10));
            self.tick()?;
        }
        self.tick()
    }

    /// Render the current app state to the terminal buffer
    pub fn render(&mut self) -> Result<()> {
        self.send(Event::Render)?;
        self.tick()
    }

    /// The rendered screen, one string per row
    pub fn screen_lines(&mut self) -> Result<Vec<String>> {
        self.render()?;
        let buf = self.tui().backend().buffer().clone();
        Ok((buf.area.top()..buf.area.bottom())
            .map(|y| {
                (buf.area.left()..buf.area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_owned()
            })
            .collect())
    }

    /// The rendered screen as a single string
    pub fn screen(&mut self) -> Result<String> {
        Ok(self.screen_lines()?.join("\n"))
    }

    /// Labels of the current results
    pub fn result_labels(&self) -> Vec<String> {
        self.shelf
            .app()
            .controller
            .results()
            .iter()
            .map(|m| m.candidate.label.clone())
            .collect()
    }

    /// Labels of the committed candidates
    pub fn committed_labels(&self) -> Vec<String> {
        self.shelf.app().committed.iter().map(|c| c.label.clone()).collect()
    }

    /// The exit code the binary would return, or None while shelf is running
    pub fn exit_code(&self) -> Option<i32> {
        let app = self.shelf.app();
        app.should_quit
            .then(|| if app.committed.is_empty() { 130 } else { 0 })
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// The catalog used by most tests
pub fn products() -> Vec<Candidate> {
    vec![
        Candidate::new(1, "Red Shirt", "https://img.test/1.png"),
        Candidate::new(2, "Blue Shirt", "https://img.test/2.png"),
        Candidate::new(3, "Red Hat", "https://img.test/3.png"),
    ]
}

/// Initialize a harness reading from `source`, without waiting for the catalog
pub fn enter_source_sized(
    source: Box<dyn CandidateSource>,
    options: ShelfOptions,
    width: u16,
    height: u16,
) -> Result<TestHarness> {
    let tui = Tui::new_for_test(TestBackend::new(width, height))?;
    enter_source_with_tui(source, options, tui)
}

/// Initialize a harness on a terminal of the given size, honoring `--height`
///
/// Heights below 100% give an inline viewport, like on a real terminal.
pub fn enter_candidates_inline(
    candidates: Vec<Candidate>,
    options: ShelfOptions,
    width: u16,
    height: u16,
) -> Result<TestHarness> {
    let size = Size::try_from(options.height.as_str())?;
    let tui = Tui::new_with_height(TestBackend::new(width, height), size)?;
    let mut harness = enter_source_with_tui(Box::new(StaticSource::new(candidates)), options, tui)?;
    harness.wait_for_catalog()?;
    Ok(harness)
}

fn enter_source_with_tui(
    source: Box<dyn CandidateSource>,
    options: ShelfOptions,
    tui: Tui<TestBackend>,
) -> Result<TestHarness> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let mut shelf = Shelf::<TestBackend>::init(options, Some(source))?;
    shelf.init_tui_with(tui);
    {
        let _guard = runtime.enter();
        shelf.start();
    }
    Ok(TestHarness { shelf, runtime })
}

/// Initialize a harness with the given candidates, once they are loaded
pub fn enter_candidates(candidates: Vec<Candidate>, options: ShelfOptions) -> Result<TestHarness> {
    let mut harness = enter_source_sized(Box::new(StaticSource::new(candidates)), options, 60, 16)?;
    harness.wait_for_catalog()?;
    Ok(harness)
}

/// Parse ShelfOptions from command-line arguments
pub fn parse_options(args: &[&str]) -> ShelfOptions {
    let mut full_args = vec!["shelf"];
    full_args.extend(args);
    ShelfOptions::try_parse_from(full_args)
        .expect("Failed to parse options")
        .build()
}

// ============================================================================
// Macros
// ============================================================================

/// Macro for writing compact interaction tests.
///
/// ```ignore
/// shelf_test!(test_name, products(), &["--opts"], {
///     @type "red";                      // Type a string
///     @char 'x';                        // Send one character
///     @key Down;                        // Send a special key
///     @ctrl 'u';                        // Send ctrl-<char>
///     @action Action::Up;               // Send an action
///     @click 3, 4;                      // Left click at column, row
///     @results ["Red Shirt", "Red Hat"];
///     @active Some(0);
///     @contains "You selected";         // Rendered screen contains text
///     @lacks "Blue Shirt";
///     @committed ["Red Hat"];
///     @exited 130;                      // Exit code if shelf quit now
///     @running;
/// });
/// ```
#[macro_export]
macro_rules! shelf_test {
    ($name:ident, $candidates:expr, $options:expr, { $($content:tt)* }) => {
        #[test]
        fn $name() -> color_eyre::Result<()> {
            let options = $crate::common::harness::parse_options($options);
            let mut h = $crate::common::harness::enter_candidates($candidates, options)?;
            $crate::shelf_test!(@expand h; $($content)*);
            Ok(())
        }
    };

    (@expand $h:ident;) => {};
    (@expand $h:ident; @type $s:expr; $($rest:tt)*) => {
        $h.type_str($s)?;
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @char $c:expr; $($rest:tt)*) => {
        $h.char($c)?;
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @key $k:ident; $($rest:tt)*) => {
        $h.key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::$k,
            crossterm::event::KeyModifiers::NONE,
        ))?;
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @ctrl $c:expr; $($rest:tt)*) => {
        $h.ctrl($c)?;
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @action $a:expr; $($rest:tt)*) => {
        $h.action($a)?;
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @click $col:expr, $row:expr; $($rest:tt)*) => {
        $h.click($col, $row)?;
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @results [$($label:expr),* $(,)?]; $($rest:tt)*) => {
        let expected: Vec<&str> = vec![$($label),*];
        assert_eq!($h.result_labels(), expected);
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @active $a:expr; $($rest:tt)*) => {
        assert_eq!($h.shelf.app().controller.active(), $a);
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @contains $s:expr; $($rest:tt)*) => {
        let screen = $h.screen()?;
        assert!(screen.contains($s), "expected {:?} on screen:\n{}", $s, screen);
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @lacks $s:expr; $($rest:tt)*) => {
        let screen = $h.screen()?;
        assert!(!screen.contains($s), "did not expect {:?} on screen:\n{}", $s, screen);
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @committed [$($label:expr),* $(,)?]; $($rest:tt)*) => {
        let expected: Vec<&str> = vec![$($label),*];
        assert_eq!($h.committed_labels(), expected);
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @exited $code:expr; $($rest:tt)*) => {
        assert_eq!($h.exit_code(), Some($code));
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
    (@expand $h:ident; @running; $($rest:tt)*) => {
        assert_eq!($h.exit_code(), None);
        $crate::shelf_test!(@expand $h; $($rest)*);
    };
}
