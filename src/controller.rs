//! The autocomplete state machine.
//!
//! [`Autocomplete`] owns the query, the full candidate set, the filtered results
//! and the active selection. Every mutation recomputes the derived state before
//! returning, so callers never observe a selection that points into a stale
//! result list. Presentation commands (revealing a row, reporting a commit) are
//! returned as [`Effect`]s rather than performed here.

use std::sync::Arc;

use crate::{Candidate, MatchedCandidate, Matcher};

/// Keys understood by the navigation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Move the selection up, wrapping through "no selection"
    Up,
    /// Move the selection down, wrapping through "no selection"
    Down,
    /// Commit the active result
    Enter,
    /// Any other key, ignored
    Other,
}

/// Commands emitted by the controller for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Bring the result row at this index into view
    Reveal(usize),
    /// A selection was committed
    Commit(Arc<Candidate>),
}

/// Autocomplete controller state
#[derive(Debug, Default)]
pub struct Autocomplete {
    candidates: Vec<Arc<Candidate>>,
    loaded: bool,
    query: String,
    results: Vec<MatchedCandidate>,
    active: Option<usize>,
}

impl Autocomplete {
    /// Creates a controller with no candidates yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a controller with an already loaded candidate set
    pub fn with_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut res = Self::new();
        res.on_candidates_loaded(candidates);
        res
    }

    /// Installs the candidate set.
    ///
    /// Only the first call has an effect; returns whether the set was installed.
    /// If the user already typed something, results are recomputed for it.
    pub fn on_candidates_loaded(&mut self, candidates: impl IntoIterator<Item = Candidate>) -> bool {
        if self.loaded {
            debug!("candidate set already loaded, ignoring");
            return false;
        }
        self.candidates = candidates.into_iter().map(Arc::new).collect();
        self.loaded = true;
        debug!("loaded {} candidates", self.candidates.len());
        if !self.query.is_empty() {
            self.recompute();
        }
        true
    }

    /// Whether the candidate set was delivered
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The full candidate set
    pub fn candidates(&self) -> &[Arc<Candidate>] {
        &self.candidates
    }

    /// The current query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The filtered results for the current query
    pub fn results(&self) -> &[MatchedCandidate] {
        &self.results
    }

    /// Index of the active result, `None` when nothing is selected
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// The active result, if any
    pub fn active_candidate(&self) -> Option<&Arc<Candidate>> {
        self.active.map(|idx| &self.results[idx].candidate)
    }

    /// Whether the result panel should be shown
    pub fn panel_visible(&self) -> bool {
        !self.query.is_empty() && !self.results.is_empty()
    }

    /// Replaces the query, recomputing the results and clearing the selection
    pub fn on_query_change(&mut self, new_text: impl Into<String>) {
        self.query = new_text.into();
        self.recompute();
    }

    /// Runs the navigation state machine
    pub fn on_key(&mut self, key: NavKey) -> Vec<Effect> {
        let last = self.results.len().checked_sub(1);
        let next = match key {
            NavKey::Up => match self.active {
                None => last,
                Some(0) => None,
                Some(idx) => Some(idx - 1),
            },
            NavKey::Down => match (self.active, last) {
                (_, None) => None,
                (Some(idx), Some(last)) if idx == last => None,
                (Some(idx), Some(_)) => Some(idx + 1),
                (None, Some(_)) => Some(0),
            },
            NavKey::Enter => {
                return match self.active {
                    Some(idx) => self.commit(idx),
                    None => Vec::new(),
                };
            }
            NavKey::Other => return Vec::new(),
        };
        trace!("{key:?}: {:?} -> {next:?}", self.active);
        self.active = next;
        next.map(Effect::Reveal).into_iter().collect()
    }

    /// Commits the result at `index`, as clicked in the result list
    pub fn on_result_click(&mut self, index: usize) -> Vec<Effect> {
        if index >= self.results.len() {
            debug!("click on out of range result {index}");
            return Vec::new();
        }
        self.commit(index)
    }

    fn commit(&mut self, index: usize) -> Vec<Effect> {
        let candidate = self.results[index].candidate.clone();
        debug!("committed {} ({})", candidate.label, candidate.id);
        self.query.clear();
        self.results.clear();
        self.active = None;
        vec![Effect::Commit(candidate)]
    }

    fn recompute(&mut self) {
        self.results = Matcher::new(&self.query).filter(&self.candidates);
        self.active = None;
    }
}
