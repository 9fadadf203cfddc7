//! Deterministic goal routing: resolve free text (an imported goal column, a
//! `--goal` argument) to one of the user's goals.
//!
//! An exact id or title wins outright; otherwise keyword overlap decides.

use std::collections::BTreeSet;

use crate::goals::Goal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteConfidence {
    High,
    Medium,
    Low,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    pub goal_index: Option<usize>,
    pub confidence: RouteConfidence,
    pub reason: String,
}

impl RouteResult {
    fn none(reason: impl Into<String>) -> Self {
        Self {
            goal_index: None,
            confidence: RouteConfidence::None,
            reason: reason.into(),
        }
    }
}

/// Distinct lowercase words of three or more characters.
fn tokenize(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(|t| t.to_string())
        .collect()
}

/// Route `text` to the best matching goal.
///
/// Scoring:
/// - exact id or case-insensitive title match: High, no further scoring
/// - otherwise +1 per distinct shared word; ties keep the earlier goal
pub fn route_to_goal(text: &str, goals: &[Goal]) -> RouteResult {
    let needle = text.trim();
    if needle.is_empty() || goals.is_empty() {
        return RouteResult::none("no text or no goals");
    }

    if let Some(idx) = goals
        .iter()
        .position(|g| g.id == needle || g.title.eq_ignore_ascii_case(needle))
    {
        return RouteResult {
            goal_index: Some(idx),
            confidence: RouteConfidence::High,
            reason: "exact match".to_string(),
        };
    }

    let tokens = tokenize(needle);
    if tokens.is_empty() {
        return RouteResult::none("no usable tokens");
    }

    let mut best: Option<(usize, usize)> = None; // (idx, overlaps)
    for (i, g) in goals.iter().enumerate() {
        let goal_tokens = tokenize(&g.title);
        let overlaps = tokens.intersection(&goal_tokens).count();

        match best {
            Some((_, best_overlaps)) if overlaps <= best_overlaps => {}
            _ => best = Some((i, overlaps)),
        }
    }

    match best {
        Some((idx, overlaps)) if overlaps >= 2 => RouteResult {
            goal_index: Some(idx),
            confidence: RouteConfidence::Medium,
            reason: format!("{overlaps} overlapping words"),
        },
        Some((idx, 1)) => RouteResult {
            goal_index: Some(idx),
            confidence: RouteConfidence::Low,
            reason: "1 overlapping word".to_string(),
        },
        _ => RouteResult::none("no overlap"),
    }
}
