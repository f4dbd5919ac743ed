//! Output record of the generator.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// One synthesized unit of activity: when a commit happens and what kind of
/// change it carries. The change content itself is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitPattern {
    /// Local to the persona's timezone
    pub timestamp: DateTime<Tz>,
    /// Number of files the commit should touch (always >= 1)
    pub file_count: u32,
    /// Fine-grained action, e.g. "fix_bug"
    pub change_kind: String,
    /// Coarse category the kind was drawn from, e.g. "fix"
    pub category: String,
    /// Rendered human-readable description
    pub description: String,
}

impl CommitPattern {
    pub fn timezone_name(&self) -> &'static str {
        self.timestamp.timezone().name()
    }
}

impl Serialize for CommitPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CommitPattern", 6)?;
        state.serialize_field("timestamp", &self.timestamp.fixed_offset().to_rfc3339())?;
        state.serialize_field("timezone", self.timezone_name())?;
        state.serialize_field("file_count", &self.file_count)?;
        state.serialize_field("change_kind", &self.change_kind)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("description", &self.description)?;
        state.end()
    }
}
