//! Sprint cycle types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Where a sprint sits in the project lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    Planning,
    FeatureDevelopment,
    Stabilization,
    Release,
    Maintenance,
    Hotfix,
}

impl ProjectPhase {
    pub fn all() -> &'static [ProjectPhase] {
        &[
            ProjectPhase::Planning,
            ProjectPhase::FeatureDevelopment,
            ProjectPhase::Stabilization,
            ProjectPhase::Release,
            ProjectPhase::Maintenance,
            ProjectPhase::Hotfix,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPhase::Planning => "planning",
            ProjectPhase::FeatureDevelopment => "feature_development",
            ProjectPhase::Stabilization => "stabilization",
            ProjectPhase::Release => "release",
            ProjectPhase::Maintenance => "maintenance",
            ProjectPhase::Hotfix => "hotfix",
        }
    }

    /// Typical intensity of a sprint in this phase, before jitter.
    pub fn base_intensity(&self) -> f64 {
        match self {
            ProjectPhase::Planning => 0.3,
            ProjectPhase::FeatureDevelopment => 0.75,
            ProjectPhase::Stabilization => 0.6,
            ProjectPhase::Release => 0.85,
            ProjectPhase::Maintenance => 0.35,
            ProjectPhase::Hotfix => 0.95,
        }
    }

    /// Category whose weight this phase floors, and the floor value.
    pub fn category_floor(&self) -> Option<(&'static str, f64)> {
        match self {
            ProjectPhase::FeatureDevelopment => Some(("feature", 0.4)),
            ProjectPhase::Stabilization => Some(("fix", 0.4)),
            ProjectPhase::Release => Some(("docs", 0.3)),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectPhase::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown project phase '{}'", s))
    }
}

/// A contiguous, phase-tagged span of the project timeline: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintCycle {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub phase: ProjectPhase,
    /// 0.0 (idle) to 1.0 (crunch).
    pub intensity: f64,
    /// `"component/feature"` tags this sprint concentrates on.
    pub focus_areas: Vec<String>,
}

impl SprintCycle {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, phase: ProjectPhase, intensity: f64) -> Self {
        Self {
            start,
            end,
            phase,
            intensity: intensity.clamp(0.0, 1.0),
            focus_areas: Vec::new(),
        }
    }

    pub fn with_focus_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Number of calendar days the cycle touches.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
