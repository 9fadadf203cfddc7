//! Task model for state-based matching.
//!
//! Tasks carry the tags the matcher scores against (energy, work type, time,
//! priority, value) plus the acceptance history the store maintains.
//! Lifecycle transitions live in `crate::task_store`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Deferred,
    Completed,
    Archived,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Deferred => "deferred",
            TaskStatus::Completed => "completed",
            TaskStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implements `as_str`, `Display` and a strict `FromStr` for a tag enum.
///
/// Every tag enum has an `Unknown` variant: persisted data written by a newer
/// build may carry members this build does not know, and those score 0.
macro_rules! tag_enum {
    ($ty:ident, $what:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $ty {
            pub const KNOWN: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label,)+
                    $ty::Unknown => "unknown",
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> anyhow::Result<Self> {
                let norm = s.trim().to_lowercase().replace(['-', ' '], "_");
                match norm.as_str() {
                    $($label => Ok($ty::$variant),)+
                    _ => anyhow::bail!(
                        "unknown {} '{}' (expected one of: {})",
                        $what,
                        s.trim(),
                        [$($label),+].join(", ")
                    ),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyRequired {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

tag_enum!(EnergyRequired, "energy level" {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    DeepWork,
    Admin,
    Creative,
    Communication,
    Learning,
    Physical,
    LightLift,
    SteadyFocus,
    #[serde(other)]
    Unknown,
}

tag_enum!(WorkType, "work type" {
    DeepWork => "deep_work",
    Admin => "admin",
    Creative => "creative",
    Communication => "communication",
    Learning => "learning",
    Physical => "physical",
    LightLift => "light_lift",
    SteadyFocus => "steady_focus",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEstimate {
    Tiny,
    Short,
    Medium,
    Long,
    Extended,
    #[serde(other)]
    Unknown,
}

tag_enum!(TimeEstimate, "time estimate" {
    Tiny => "tiny",
    Short => "short",
    Medium => "medium",
    Long => "long",
    Extended => "extended",
});

impl TimeEstimate {
    /// Ordinal weight on the same 1-5 scale as a check-in's available time.
    /// Unrecognized estimates sit in the middle.
    pub fn ordinal(&self) -> i32 {
        match self {
            TimeEstimate::Tiny => 1,
            TimeEstimate::Short => 2,
            TimeEstimate::Medium => 3,
            TimeEstimate::Long => 4,
            TimeEstimate::Extended => 5,
            TimeEstimate::Unknown => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    MustDo,
    ShouldDo,
    CouldDo,
    Someday,
    #[serde(other)]
    Unknown,
}

tag_enum!(Priority, "priority" {
    MustDo => "must_do",
    ShouldDo => "should_do",
    CouldDo => "could_do",
    Someday => "someday",
});

/// A task as entered by the user, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub energy_required: EnergyRequired,
    pub work_type: WorkType,
    pub time_estimate: TimeEstimate,
    pub priority: Priority,
    pub estimated_value: Option<f64>,
    pub goal_id: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            energy_required: EnergyRequired::Medium,
            work_type: WorkType::SteadyFocus,
            time_estimate: TimeEstimate::Medium,
            priority: Priority::ShouldDo,
            estimated_value: None,
            goal_id: None,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.title.trim().is_empty() {
            anyhow::bail!("task title must be non-empty");
        }
        if let Some(v) = self.estimated_value {
            if !v.is_finite() || v < 0.0 {
                anyhow::bail!("estimated value must be a non-negative amount, got {v}");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    pub status: TaskStatus,

    pub energy_required: EnergyRequired,
    pub work_type: WorkType,
    pub time_estimate: TimeEstimate,
    pub priority: Priority,

    /// Money the task is worth, in the user's currency. Display only.
    pub estimated_value: Option<f64>,

    /// Bumped when the user completes a recommended task.
    #[serde(default)]
    pub times_accepted: u32,
    /// Bumped when the user defers a recommended task.
    #[serde(default)]
    pub times_declined: u32,

    pub goal_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Local day the task comes back from `Deferred`.
    pub deferred_until: Option<NaiveDate>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::from_new(id, NewTask::new(title), Utc::now())
    }

    pub fn from_new(id: impl Into<String>, new: NewTask, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: new.title,
            status: TaskStatus::Active,
            energy_required: new.energy_required,
            work_type: new.work_type,
            time_estimate: new.time_estimate,
            priority: new.priority,
            estimated_value: new.estimated_value,
            times_accepted: 0,
            times_declined: 0,
            goal_id: new.goal_id,
            created_at,
            completed_at: None,
            deferred_until: None,
        }
    }

    pub fn with_energy(mut self, energy: EnergyRequired) -> Self {
        self.energy_required = energy;
        self
    }

    pub fn with_work_type(mut self, work_type: WorkType) -> Self {
        self.work_type = work_type;
        self
    }

    pub fn with_time(mut self, time: TimeEstimate) -> Self {
        self.time_estimate = time;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.estimated_value = Some(value);
        self
    }

    pub fn with_history(mut self, accepted: u32, declined: u32) -> Self {
        self.times_accepted = accepted;
        self.times_declined = declined;
        self
    }

    pub fn with_goal(mut self, goal_id: impl Into<String>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }
}
