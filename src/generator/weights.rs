//! Phase-aware category weights and weighted category selection.

use std::collections::BTreeMap;

use rand::Rng;

use crate::sprint::ProjectPhase;

/// Category chosen when a weight table has no positive entry.
pub const DEFAULT_CATEGORY: &str = "feature";

/// Copy `base` and raise the phase's focus category to its floor.
///
/// Only the floored category changes, and only upward. The result is not
/// renormalized, so total weight grows in feature, stabilization and
/// release sprints.
pub fn adjust_for_phase(base: &BTreeMap<String, f64>, phase: ProjectPhase) -> BTreeMap<String, f64> {
    let mut adjusted = base.clone();
    if let Some((category, floor)) = phase.category_floor() {
        let weight = adjusted.entry(category.to_string()).or_insert(0.0);
        if *weight < floor {
            *weight = floor;
        }
    }
    adjusted
}

fn is_usable(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

/// Pick a category with probability proportional to its weight.
///
/// Walks categories in name order accumulating weight and returns the first
/// whose running total meets the draw from `[0, total)`. Non-positive
/// weights are never chosen; an empty or all-zero table yields
/// [`DEFAULT_CATEGORY`].
pub fn select_category<R: Rng + ?Sized>(weights: &BTreeMap<String, f64>, rng: &mut R) -> String {
    let total: f64 = weights.values().copied().filter(|w| is_usable(*w)).sum();
    if !is_usable(total) {
        return DEFAULT_CATEGORY.to_string();
    }

    let draw = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last = None;
    for (category, weight) in weights.iter().filter(|(_, w)| is_usable(**w)) {
        cumulative += weight;
        if cumulative >= draw {
            return category.clone();
        }
        last = Some(category);
    }

    // Float rounding can leave the running total a hair under the draw
    last.cloned().unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}
