use crossterm::event::{KeyEvent, MouseEvent};

use crate::Candidate;

/// Events that can occur during shelf's execution
#[derive(Clone, Debug)]
pub enum Event {
    /// Quit the application
    Quit,
    /// An error occurred
    Error(String),
    /// Render the UI
    Render,
    /// Heartbeat event, drives the loading spinner
    Heartbeat,
    /// A key was pressed
    Key(KeyEvent),
    /// A mouse event occurred
    Mouse(MouseEvent),
    /// An action was triggered
    Action(Action),
    /// The catalog fetch completed
    CandidatesLoaded(Vec<Candidate>),
    /// Redraw the screen
    Redraw,
}

/// Actions that can be bound to keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Quit without committing
    Abort,
    /// Commit the active result
    Accept,
    /// Add a character to the query
    AddChar(char),
    /// Delete the last character of the query
    BackwardDeleteChar,
    /// Move the selection down
    Down,
    /// Ignore the key
    Ignore,
    /// Clear and redraw the screen
    Redraw,
    /// Clear the query
    UnixLineDiscard,
    /// Delete the previous word of the query
    UnixWordRubout,
    /// Move the selection up
    Up,
}

/// Parses an action name into an Action
pub fn parse_action(raw_action: &str) -> Option<Action> {
    use Action::*;
    let (action, arg) = match raw_action.split_once(':') {
        Some((act, arg)) => (act, Some(arg)),
        None => (raw_action, None),
    };
    debug!("parse_action: action={action}, arg={arg:?}");
    match action {
        "abort" => Some(Abort),
        "accept" => Some(Accept),
        "add-char" => arg.and_then(|a| a.chars().next()).map(AddChar),
        "backward-delete-char" => Some(BackwardDeleteChar),
        "down" => Some(Down),
        "ignore" => Some(Ignore),
        "redraw" | "clear-screen" => Some(Redraw),
        "unix-line-discard" => Some(UnixLineDiscard),
        "unix-word-rubout" => Some(UnixWordRubout),
        "up" => Some(Up),
        _ => None,
    }
}
