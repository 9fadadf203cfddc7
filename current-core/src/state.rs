//! Check-in state: the five self-reported dimensions a user declares.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Lowest and highest value a check-in dimension may take.
pub const DIMENSION_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// A user's declared state at check-in time.
///
/// Each dimension is nominally 1-5. The matcher does arithmetic on whatever it
/// is given; range checks belong to whoever produces the state (`validate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub energy_level: i32,
    pub mental_clarity: i32,
    pub emotional_state: i32,
    pub available_time: i32,
    pub environment_quality: i32,
}

/// Coarse capacity band derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyBand {
    Low,
    Mid,
    High,
}

impl EnergyBand {
    /// `< 2.5` is low, `[2.5, 4)` is mid, `>= 4` is high.
    pub fn from_composite(composite: f64) -> Self {
        if composite < 2.5 {
            EnergyBand::Low
        } else if composite < 4.0 {
            EnergyBand::Mid
        } else {
            EnergyBand::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnergyBand::Low => "low",
            EnergyBand::Mid => "mid",
            EnergyBand::High => "high",
        }
    }
}

impl UserState {
    pub fn new(
        energy_level: i32,
        mental_clarity: i32,
        emotional_state: i32,
        available_time: i32,
        environment_quality: i32,
    ) -> Self {
        Self {
            energy_level,
            mental_clarity,
            emotional_state,
            available_time,
            environment_quality,
        }
    }

    /// Every dimension set to the same level.
    pub fn uniform(level: i32) -> Self {
        Self::new(level, level, level, level, level)
    }

    pub fn dimensions(&self) -> [(&'static str, i32); 5] {
        [
            ("energy_level", self.energy_level),
            ("mental_clarity", self.mental_clarity),
            ("emotional_state", self.emotional_state),
            ("available_time", self.available_time),
            ("environment_quality", self.environment_quality),
        ]
    }

    /// Mean of all five dimensions. Recomputed on demand, never stored.
    pub fn composite_score(&self) -> f64 {
        let sum: f64 = self.dimensions().iter().map(|(_, v)| f64::from(*v)).sum();
        sum / 5.0
    }

    pub fn energy_band(&self) -> EnergyBand {
        EnergyBand::from_composite(self.composite_score())
    }

    /// Producer-side range check for check-in input.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.dimensions() {
            if !DIMENSION_RANGE.contains(&value) {
                bail!(
                    "{name} must be between {} and {}, got {value}",
                    DIMENSION_RANGE.start(),
                    DIMENSION_RANGE.end()
                );
            }
        }
        Ok(())
    }
}
