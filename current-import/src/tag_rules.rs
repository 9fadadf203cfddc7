//! Deterministic tag rules: guess work type and energy from a task title when
//! an import leaves those columns blank.
//!
//! Whole-word keyword matching only. First rule that hits wins, so the more
//! specific families come first.

use current_core::task::{EnergyRequired, WorkType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferredTags {
    pub work_type: WorkType,
    pub energy: EnergyRequired,
}

const RULES: &[(&[&str], WorkType, EnergyRequired)] = &[
    (
        &["email", "reply", "call", "message", "text", "slack", "meeting", "follow"],
        WorkType::Communication,
        EnergyRequired::Low,
    ),
    (
        &["invoice", "expense", "expenses", "receipt", "receipts", "form", "renew", "pay", "taxes", "file"],
        WorkType::Admin,
        EnergyRequired::Low,
    ),
    (
        &["gym", "run", "walk", "workout", "yoga", "swim", "stretch", "clean"],
        WorkType::Physical,
        EnergyRequired::Medium,
    ),
    (
        &["read", "course", "study", "learn", "tutorial", "lecture", "chapter"],
        WorkType::Learning,
        EnergyRequired::Medium,
    ),
    (
        &["design", "sketch", "draw", "brainstorm", "compose", "paint", "logo"],
        WorkType::Creative,
        EnergyRequired::High,
    ),
    (
        &["write", "draft", "code", "implement", "research", "analyze", "plan", "report"],
        WorkType::DeepWork,
        EnergyRequired::High,
    ),
    (
        &["tidy", "water", "sort", "organize", "quick"],
        WorkType::LightLift,
        EnergyRequired::Low,
    ),
];

/// Guess tags for `title`. Falls back to steady focus at medium energy.
pub fn infer_tags(title: &str) -> InferredTags {
    let lower = title.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (keywords, work_type, energy) in RULES {
        if words.iter().any(|w| keywords.contains(w)) {
            return InferredTags {
                work_type: *work_type,
                energy: *energy,
            };
        }
    }

    InferredTags {
        work_type: WorkType::SteadyFocus,
        energy: EnergyRequired::Medium,
    }
}
