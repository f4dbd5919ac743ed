//! Sprint cycle model: phase-tagged spans of the project timeline.

pub mod planner;
pub mod types;

pub use planner::{PlannerConfig, SprintPlanner, DEFAULT_FOCUS_AREAS};
pub use types::{ProjectPhase, SprintCycle};
