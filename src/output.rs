use std::sync::Arc;

use crate::Candidate;

/// What shelf returns when it exits
#[derive(Debug, Clone, Default)]
pub struct ShelfOutput {
    /// The query when shelf exited
    pub query: String,
    /// Every committed candidate, in commit order
    pub committed: Vec<Arc<Candidate>>,
    /// Whether the user left without committing anything
    pub is_abort: bool,
}

impl ShelfOutput {
    /// Process exit code: 0 when something was committed, 130 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_abort { 130 } else { 0 }
    }
}
