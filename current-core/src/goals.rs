//! Goal types. Tasks can point at a goal by id; the goal is a label only and
//! plays no part in scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How far out a goal sits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Horizon {
    #[serde(rename = "long")]
    Long, // Multi-year
    #[serde(rename = "medium")]
    Medium, // Months to a year
    #[serde(rename = "short")]
    Short, // Days to weeks
}

impl Horizon {
    pub fn label(&self) -> &'static str {
        match self {
            Horizon::Long => "long-term",
            Horizon::Medium => "medium-term",
            Horizon::Short => "short-term",
        }
    }
}

impl FromStr for Horizon {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "long-term" | "long term" | "long" => Ok(Horizon::Long),
            "medium-term" | "medium term" | "medium" => Ok(Horizon::Medium),
            "short-term" | "short term" | "short" => Ok(Horizon::Short),
            other => anyhow::bail!("unknown horizon '{other}' (expected long, medium or short)"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub horizon: Horizon,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        horizon: Horizon,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            horizon,
            description: None,
            created_at,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Next free id of the form `g-0001`, one past the highest already used.
pub fn next_goal_id(goals: &[Goal]) -> String {
    let max = goals
        .iter()
        .filter_map(|g| g.id.strip_prefix("g-"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("g-{:04}", max + 1)
}

/// Display label for a task's goal association.
pub fn goal_title<'a>(goals: &'a [Goal], id: &str) -> Option<&'a str> {
    goals.iter().find(|g| g.id == id).map(|g| g.title.as_str())
}
