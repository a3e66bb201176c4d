//! Case-insensitive substring matching over the candidate set.
//!
//! A candidate matches when its label, case-folded, contains the query,
//! case-folded. Results keep the order of the source set: there is no ranking.

use std::sync::Arc;

use crate::Candidate;

/// A candidate that matched the current query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedCandidate {
    /// The matched candidate
    pub candidate: Arc<Candidate>,
    /// Character range `(start, end)` of the first occurrence of the query in the label.
    ///
    /// `None` when the query is empty.
    pub range: Option<(usize, usize)>,
}

/// Matches labels against a single query
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    folded_query: String,
}

impl Matcher {
    /// Creates a matcher for the given query
    pub fn new(query: &str) -> Self {
        Self {
            folded_query: fold(query).0,
        }
    }

    /// Matches a label, returning the matched char range on success
    ///
    /// The outer `Option` tells whether the label matched, the inner one carries
    /// the range (which is absent for the empty query).
    pub fn match_label(&self, label: &str) -> Option<Option<(usize, usize)>> {
        if self.folded_query.is_empty() {
            return Some(None);
        }
        let (folded, origin) = fold(label);
        let start = folded.find(&self.folded_query)?;
        let end = start + self.folded_query.len();
        Some(Some((origin[start], origin[end - 1] + 1)))
    }

    /// Filters the candidates, preserving their order
    pub fn filter(&self, candidates: &[Arc<Candidate>]) -> Vec<MatchedCandidate> {
        let res: Vec<_> = candidates
            .iter()
            .filter_map(|candidate| {
                self.match_label(&candidate.label).map(|range| MatchedCandidate {
                    candidate: candidate.clone(),
                    range,
                })
            })
            .collect();
        trace!(
            "matcher: {}/{} candidates match {:?}",
            res.len(),
            candidates.len(),
            self.folded_query
        );
        res
    }
}

/// Lowercases `text` as a whole, so context rules like the word-final sigma apply.
///
/// Returns the folded string and, for every byte of it, the index of the
/// char of `text` it came from.
fn fold(text: &str) -> (String, Vec<usize>) {
    let folded = text.to_lowercase();
    let mut origin = Vec::with_capacity(folded.len());
    for (char_idx, ch) in text.chars().enumerate() {
        // contextual lowercasing only swaps same-width forms (σ/ς)
        let len: usize = ch.to_lowercase().map(char::len_utf8).sum();
        origin.extend(std::iter::repeat_n(char_idx, len));
    }
    debug_assert_eq!(origin.len(), folded.len());
    (folded, origin)
}
