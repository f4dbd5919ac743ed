//! Change-category table: file-count ranges and change-kind labels.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Change kind used when a category has no kinds to draw from.
pub const UNKNOWN_KIND: &str = "unknown";

/// What a commit in one category looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Fewest files touched (inclusive)
    pub min_files: u32,
    /// Most files touched (inclusive)
    pub max_files: u32,
    /// Fine-grained change-kind labels, e.g. "fix_bug"
    #[serde(default)]
    pub kinds: Vec<String>,
}

impl CategorySpec {
    fn new(min_files: u32, max_files: u32, kinds: &[&str]) -> Self {
        Self {
            min_files,
            max_files,
            kinds: kinds.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Draw a file count uniformly from the range. Always at least 1; an
    /// inverted range collapses to `min_files`.
    pub fn draw_file_count<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let lo = self.min_files.max(1);
        let hi = self.max_files;
        if hi <= lo {
            return lo;
        }
        rng.gen_range(lo..=hi)
    }

    /// Draw a change kind uniformly, or [`UNKNOWN_KIND`] when there are none.
    pub fn draw_change_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.kinds
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_KIND.to_string())
    }
}

/// Static mapping from category name to its [`CategorySpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    entries: BTreeMap<String, CategorySpec>,
    fallback: CategorySpec,
}

impl CategoryTable {
    /// Table with the bundled categories.
    pub fn builtin() -> Self {
        let entries = [
            ("feature", CategorySpec::new(2, 5, &["add_feature", "enhance_feature", "implement_feature"])),
            ("fix", CategorySpec::new(1, 3, &["fix_bug", "handle_edge_case", "improve_error_handling"])),
            ("refactor", CategorySpec::new(2, 6, &["restructure_code", "extract_function", "rename_symbols"])),
            ("docs", CategorySpec::new(1, 2, &["update_docs", "add_examples", "fix_typos"])),
            ("test", CategorySpec::new(1, 4, &["add_tests", "improve_coverage", "fix_flaky_test"])),
            ("chore", CategorySpec::new(1, 3, &["update_dependencies", "tweak_config", "cleanup"])),
        ]
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect();

        Self {
            entries,
            fallback: CategorySpec::new(1, 1, &[]),
        }
    }

    /// Bundled table with entries from config added or replaced.
    pub fn with_overrides(overrides: &BTreeMap<String, CategorySpec>) -> Self {
        let mut table = Self::builtin();
        for (name, spec) in overrides {
            table.entries.insert(name.clone(), spec.clone());
        }
        table
    }

    /// Spec for `category`, or the fallback (one file, kind "unknown") for
    /// categories the table does not list.
    pub fn spec(&self, category: &str) -> &CategorySpec {
        self.entries.get(category).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_builtin_ranges_are_sane() {
        let table = CategoryTable::builtin();
        for name in table.entries.keys() {
            let spec = table.spec(name);
            assert!(spec.min_files >= 1);
            assert!(spec.min_files <= spec.max_files);
            assert!(!spec.kinds.is_empty());
        }
    }

    #[test]
    fn test_file_count_within_range_and_reaches_endpoints() {
        let table = CategoryTable::builtin();
        let spec = table.spec("feature");
        let mut rng = StdRng::seed_from_u64(3);
        let counts: Vec<u32> = (0..500).map(|_| spec.draw_file_count(&mut rng)).collect();
        assert!(counts.iter().all(|c| (2..=5).contains(c)));
        assert!(counts.contains(&2));
        assert!(counts.contains(&5));
    }

    #[test]
    fn test_inverted_range_collapses_to_min() {
        let spec = CategorySpec::new(4, 2, &["x"]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(spec.draw_file_count(&mut rng), 4);
    }

    #[test]
    fn test_zero_range_still_touches_a_file() {
        let spec = CategorySpec::new(0, 0, &["x"]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(spec.draw_file_count(&mut rng), 1);
    }

    #[test]
    fn test_empty_kinds_fall_back_to_unknown() {
        let spec = CategorySpec::new(1, 2, &[]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(spec.draw_change_kind(&mut rng), UNKNOWN_KIND);
    }

    #[test]
    fn test_unlisted_category_uses_fallback() {
        let table = CategoryTable::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(!table.contains("perf"));
        let spec = table.spec("perf");
        assert_eq!(spec.draw_file_count(&mut rng), 1);
        assert_eq!(spec.draw_change_kind(&mut rng), UNKNOWN_KIND);
    }

    #[test]
    fn test_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("perf".to_string(), CategorySpec::new(1, 2, &["optimize_hot_path"]));
        overrides.insert("docs".to_string(), CategorySpec::new(3, 3, &["rewrite_readme"]));

        let table = CategoryTable::with_overrides(&overrides);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(table.contains("perf"));
        assert_eq!(table.spec("docs").draw_file_count(&mut rng), 3);
        assert_eq!(table.spec("docs").draw_change_kind(&mut rng), "rewrite_readme");
        assert!(table.contains("feature"));
    }
}
