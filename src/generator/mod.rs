//! Commit pattern generation: weighted category selection, commit-time
//! allocation, phase-aware weight flooring and description templates.

pub mod categories;
pub mod describe;
pub mod engine;
pub mod schedule;
pub mod types;
pub mod weights;

pub use categories::{CategorySpec, CategoryTable};
pub use engine::{run_rng, CommitPatternGenerator};
pub use types::CommitPattern;
