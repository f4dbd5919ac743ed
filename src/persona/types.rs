//! Core types for the persona system.
//!
//! A persona describes how a simulated developer works: when they are at
//! the keyboard, how often they commit, and which kinds of change they
//! tend to make.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Frequency Class
// ─────────────────────────────────────────────────────────────────

/// How many commits a persona produces on an active day.
///
/// Ordered `Sparse < Moderate < Frequent`; sprint intensity moves a persona
/// at most one step along this scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyClass {
    Sparse,
    Moderate,
    Frequent,
}

impl FrequencyClass {
    pub fn all() -> &'static [FrequencyClass] {
        &[
            FrequencyClass::Sparse,
            FrequencyClass::Moderate,
            FrequencyClass::Frequent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyClass::Sparse => "sparse",
            FrequencyClass::Moderate => "moderate",
            FrequencyClass::Frequent => "frequent",
        }
    }

    /// Inclusive range of commits drawn per working day.
    pub fn commit_range(&self) -> (u32, u32) {
        match self {
            FrequencyClass::Sparse => (1, 4),
            FrequencyClass::Moderate => (4, 8),
            FrequencyClass::Frequent => (8, 15),
        }
    }

    /// One step up the scale, capped at `Frequent`.
    pub fn escalate(self) -> Self {
        match self {
            FrequencyClass::Sparse => FrequencyClass::Moderate,
            FrequencyClass::Moderate | FrequencyClass::Frequent => FrequencyClass::Frequent,
        }
    }

    /// One step down the scale, floored at `Sparse`.
    pub fn deescalate(self) -> Self {
        match self {
            FrequencyClass::Frequent => FrequencyClass::Moderate,
            FrequencyClass::Moderate | FrequencyClass::Sparse => FrequencyClass::Sparse,
        }
    }

    /// Shift the class by sprint intensity: above 0.8 escalates, below 0.4
    /// de-escalates, anything in between leaves it unchanged.
    pub fn adjusted_for_intensity(self, intensity: f64) -> Self {
        if intensity > 0.8 {
            self.escalate()
        } else if intensity < 0.4 {
            self.deescalate()
        } else {
            self
        }
    }
}

impl fmt::Display for FrequencyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        FrequencyClass::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown frequency class '{}'. Valid: sparse, moderate, frequent",
                    s
                )
            })
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// A named developer archetype.
///
/// Built-in personas live in [`super::catalog`]; extra ones can be declared
/// as `[[personas]]` tables in the config file, which is why the type is
/// deserializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique key used on the command line (e.g. "early_bird").
    pub name: String,

    /// Short human-readable description.
    #[serde(default)]
    pub description: String,

    /// First working hour, local to `timezone`.
    pub work_start_hour: u32,

    /// Working hours end before this hour, local to `timezone`.
    pub work_end_hour: u32,

    /// IANA timezone identifier (e.g. "America/New_York").
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Baseline commit cadence before sprint adjustment.
    pub frequency: FrequencyClass,

    /// Message templates with `{component}`, `{feature}` and `{issue}`
    /// placeholders.
    #[serde(default)]
    pub templates: Vec<String>,

    /// Relative weight per change category. Weights need not sum to 1.
    #[serde(default)]
    pub category_weights: BTreeMap<String, f64>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Persona {
    /// Hour at which the one-hour lunch break starts.
    pub fn lunch_hour(&self) -> u32 {
        self.work_start_hour + 4
    }

    /// Check the invariants a config-defined persona must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if self.work_start_hour > 23 || self.work_end_hour > 23 {
            return Err(format!(
                "work hours must be between 0 and 23 (got {}-{})",
                self.work_start_hour, self.work_end_hour
            ));
        }
        if self.work_start_hour >= self.work_end_hour {
            return Err(format!(
                "work_start_hour ({}) must be before work_end_hour ({})",
                self.work_start_hour, self.work_end_hour
            ));
        }
        if let Some((category, weight)) = self
            .category_weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(format!(
                "weight for '{}' must be a non-negative number (got {})",
                category, weight
            ));
        }
        Ok(())
    }
}
