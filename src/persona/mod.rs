//! Persona system: developer archetypes that drive commit generation.
//!
//! Each persona fixes a work-hour window, a timezone, a baseline commit
//! frequency, a preference over change categories, and message templates.

pub mod catalog;
pub mod types;

pub use catalog::PersonaCatalog;
pub use types::{FrequencyClass, Persona};
