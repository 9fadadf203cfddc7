//! Check-in records: what the user reported and what they were offered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matcher::RankedMatch;
use crate::state::UserState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub recorded_at: DateTime<Utc>,
    pub state: UserState,
    pub note: Option<String>,
    /// Ids of the tasks recommended for this check-in, best first.
    #[serde(default)]
    pub recommended: Vec<String>,
}

impl CheckIn {
    pub fn new(state: UserState, recorded_at: DateTime<Utc>) -> Self {
        Self {
            recorded_at,
            state,
            note: None,
            recommended: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        if !note.trim().is_empty() {
            self.note = Some(note.trim().to_string());
        }
        self
    }

    pub fn with_recommendations(mut self, matches: &[RankedMatch<'_>]) -> Self {
        self.recommended = matches.iter().map(|m| m.task.id.clone()).collect();
        self
    }

    pub fn composite_score(&self) -> f64 {
        self.state.composite_score()
    }
}
