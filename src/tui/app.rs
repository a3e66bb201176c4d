use std::sync::Arc;

use color_eyre::eyre::{Result, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::prelude::Backend;
use ratatui::widgets::Widget;

use super::Event;
use super::Tui;
use super::event::Action;
use super::input::Input;
use super::notice::Notice;
use super::result_list::ResultList;
use crate::tui::widget::ShelfWidget;
use crate::{Autocomplete, Candidate, Effect, NavKey, ShelfOptions};

const INPUT_HEIGHT: u16 = 3;

/// Application state for shelf's TUI
pub struct App {
    /// The autocomplete state machine
    pub controller: Autocomplete,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Current cursor position (x, y)
    pub cursor_pos: (u16, u16),
    /// Candidates committed so far, in order
    pub committed: Vec<Arc<Candidate>>,

    /// Query input widget
    pub input: Input,
    /// Result panel widget
    pub result_list: ResultList,
    /// Selection notice widget
    pub notice: Notice,
    /// Color theme
    pub theme: Arc<crate::theme::ColorTheme>,

    /// Shelf configuration options
    pub options: ShelfOptions,
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controller = &self.controller;
        self.input.status.matched = controller.results().len();
        self.input.status.total = controller.candidates().len();
        self.input.status.loading = !controller.is_loaded();

        let panel_height = if controller.panel_visible() {
            self.result_list.panel_height(controller.results().len())
        } else {
            0
        };
        let [input_area, list_area, _] = Layout::vertical([
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(panel_height),
            Constraint::Fill(1),
        ])
        .areas(area);

        self.input.render(controller.query(), input_area, buf);
        if panel_height > 0 {
            self.result_list
                .render(controller.results(), controller.active(), list_area, buf);
        } else {
            self.result_list.area = None;
        }
        self.notice.render(area, buf);

        // inside the input border
        self.cursor_pos = (
            (input_area.x + 1 + self.input.cursor_pos(controller.query())).min(input_area.right().saturating_sub(2)),
            input_area.y + 1,
        );
    }
}

impl App {
    /// Creates the app from the options
    pub fn from_options(options: ShelfOptions, theme: Arc<crate::theme::ColorTheme>) -> Self {
        let mut controller = Autocomplete::new();
        if !options.query.is_empty() {
            controller.on_query_change(options.query.as_str());
        }
        Self {
            controller,
            should_quit: false,
            cursor_pos: (0, 0),
            committed: Vec::new(),
            input: Input::from_options(&options, theme.clone()),
            result_list: ResultList::from_options(&options, theme.clone()),
            notice: Notice::from_options(&options, theme.clone()),
            theme,
            options,
        }
    }

    /// Handles a TUI event and updates application state
    pub fn handle_event<B: Backend>(&mut self, tui: &mut Tui<B>, event: &Event) -> Result<()>
    where
        B::Error: Send + Sync + 'static,
    {
        match event {
            Event::Render => {
                tui.draw(|f| {
                    f.render_widget(&mut *self, f.area());
                    if !self.notice.is_shown() {
                        f.set_cursor_position(self.cursor_pos);
                    }
                })?;
            }
            Event::Heartbeat => {
                if !self.controller.is_loaded() {
                    self.input.status.ticks = self.input.status.ticks.wrapping_add(1);
                    tui.event_tx.send(Event::Render)?;
                }
            }
            Event::CandidatesLoaded(candidates) => {
                if self.controller.on_candidates_loaded(candidates.iter().cloned()) {
                    self.result_list.reset();
                    tui.event_tx.send(Event::Render)?;
                }
            }
            Event::Quit => {
                tui.exit()?;
                self.should_quit = true;
            }
            Event::Error(msg) => {
                tui.exit()?;
                bail!(msg.to_owned());
            }
            Event::Action(act) => {
                for evt in self.handle_action(act) {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Key(key) => {
                for evt in self.handle_key(key) {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Mouse(mouse_event) => {
                for evt in self.handle_mouse(mouse_event) {
                    tui.event_tx.send(evt)?;
                }
            }
            Event::Redraw => {
                tui.clear()?;
            }
        };

        Ok(())
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Vec<Event> {
        debug!("key event: {:?}", key);
        if self.notice.is_shown() {
            return self.handle_notice_key(key);
        }
        self.options
            .keymap
            .actions_for(key)
            .into_iter()
            .map(Event::Action)
            .collect()
    }

    /// While the notice is open, only acknowledging it or aborting goes through
    fn handle_notice_key(&mut self, key: &KeyEvent) -> Vec<Event> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => vec![Event::Quit],
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) => self.acknowledge_notice(),
            _ => {
                trace!("notice is open, ignoring {key:?}");
                Vec::new()
            }
        }
    }

    fn acknowledge_notice(&mut self) -> Vec<Event> {
        let Some(candidate) = self.notice.acknowledge() else {
            return Vec::new();
        };
        debug!("acknowledged selection of {}", candidate.id);
        if self.options.once {
            vec![Event::Quit]
        } else {
            vec![Event::Render]
        }
    }

    fn handle_action(&mut self, act: &Action) -> Vec<Event> {
        use Action::*;
        if self.notice.is_shown() {
            trace!("notice is open, ignoring {act:?}");
            return Vec::new();
        }
        match act {
            Abort => return vec![Event::Quit],
            Accept => self.navigate(NavKey::Enter),
            Up => self.navigate(NavKey::Up),
            Down => self.navigate(NavKey::Down),
            Redraw => return vec![Event::Redraw, Event::Render],
            Ignore => return Vec::new(),
            AddChar(_) | BackwardDeleteChar | UnixLineDiscard | UnixWordRubout => {
                if let Some(query) = Input::apply(act, self.controller.query()) {
                    self.controller.on_query_change(query);
                    self.result_list.reset();
                }
            }
        }
        vec![Event::Render]
    }

    fn navigate(&mut self, key: NavKey) {
        let effects = self.controller.on_key(key);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Reveal(index) => self.result_list.reveal(index),
                Effect::Commit(candidate) => {
                    info!("selected {} ({})", candidate.label, candidate.id);
                    self.result_list.reset();
                    self.committed.push(candidate.clone());
                    self.notice.show(candidate);
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse_event: &MouseEvent) -> Vec<Event> {
        let pos = Position {
            x: mouse_event.column,
            y: mouse_event.row,
        };
        match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) if self.notice.is_shown() => self.acknowledge_notice(),
            _ if self.notice.is_shown() => Vec::new(),
            MouseEventKind::Down(MouseButton::Left) => match self.result_list.index_at(pos) {
                Some(index) => {
                    debug!("clicked result {index}");
                    let effects = self.controller.on_result_click(index);
                    self.apply_effects(effects);
                    vec![Event::Render]
                }
                None => Vec::new(),
            },
            MouseEventKind::ScrollUp if self.result_list.area.is_some_and(|a| a.contains(pos)) => {
                self.handle_action(&Action::Up)
            }
            MouseEventKind::ScrollDown if self.result_list.area.is_some_and(|a| a.contains(pos)) => {
                self.handle_action(&Action::Down)
            }
            _ => Vec::new(),
        }
    }
}
