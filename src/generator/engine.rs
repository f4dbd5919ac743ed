//! Commit pattern generator: composes personas, sprint cycles, days and
//! commits into an ordered activity sequence.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::persona::{FrequencyClass, Persona, PersonaCatalog};
use crate::sprint::{SprintCycle, SprintPlanner};

use super::categories::CategoryTable;
use super::describe::describe;
use super::schedule::{commit_times, draw_commit_count, persona_timezone};
use super::types::CommitPattern;
use super::weights::{adjust_for_phase, select_category};

/// Orchestrates pattern generation.
///
/// Holds only immutable lookup tables; every call takes its own random
/// source, so one generator can serve independent runs side by side.
#[derive(Debug, Clone, Default)]
pub struct CommitPatternGenerator {
    catalog: PersonaCatalog,
    categories: CategoryTable,
    planner: SprintPlanner,
}

/// Per-cycle parameters shared by every day of the cycle.
struct CycleContext<'a> {
    persona: &'a Persona,
    tz: Tz,
    cycle: &'a SprintCycle,
    frequency: FrequencyClass,
    weights: BTreeMap<String, f64>,
}

impl CommitPatternGenerator {
    pub fn new(catalog: PersonaCatalog, categories: CategoryTable, planner: SprintPlanner) -> Self {
        for persona in catalog.iter() {
            for category in persona.category_weights.keys() {
                if !categories.contains(category) {
                    warn!(
                        persona = %persona.name,
                        category = %category,
                        "Category has no table entry, commits will touch one file"
                    );
                }
            }
        }

        Self {
            catalog,
            categories,
            planner,
        }
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    /// Generate patterns for `[start, end)`.
    ///
    /// An empty `persona_name` picks a persona at random; an unknown name is
    /// an error. `end <= start` yields an empty sequence. The output is in
    /// chronological order.
    pub fn generate_patterns<R: Rng + ?Sized>(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        persona_name: &str,
        rng: &mut R,
    ) -> Result<Vec<CommitPattern>> {
        let persona = self.catalog.resolve(persona_name, rng)?;
        let cycles = self.planner.plan(start, end, rng);
        Ok(self.patterns_for_cycles(persona, &cycles, rng))
    }

    /// Like [`generate_patterns`](Self::generate_patterns) with a fresh
    /// random source for this run: seeded when `seed` is given, otherwise
    /// from OS entropy.
    pub fn generate_with_seed(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        persona_name: &str,
        seed: Option<u64>,
    ) -> Result<Vec<CommitPattern>> {
        let mut rng = run_rng(seed);
        self.generate_patterns(start, end, persona_name, &mut rng)
    }

    fn patterns_for_cycles<R: Rng + ?Sized>(
        &self,
        persona: &Persona,
        cycles: &[SprintCycle],
        rng: &mut R,
    ) -> Vec<CommitPattern> {
        let run_id = uuid::Uuid::new_v4();
        let tz = persona_timezone(persona);

        let mut patterns = Vec::new();
        for cycle in cycles {
            let ctx = CycleContext {
                persona,
                tz,
                cycle,
                frequency: persona.frequency.adjusted_for_intensity(cycle.intensity),
                weights: adjust_for_phase(&persona.category_weights, cycle.phase),
            };
            debug!(
                run_id = %run_id,
                phase = %cycle.phase,
                intensity = cycle.intensity,
                frequency = %ctx.frequency,
                "Generating sprint"
            );
            patterns.extend(self.cycle_patterns(&ctx, rng));
        }

        info!(
            run_id = %run_id,
            persona = %persona.name,
            cycles = cycles.len(),
            commits = patterns.len(),
            "Generated commit patterns"
        );
        patterns
    }

    fn cycle_patterns<R: Rng + ?Sized>(&self, ctx: &CycleContext<'_>, rng: &mut R) -> Vec<CommitPattern> {
        let mut patterns = Vec::new();
        let mut current = ctx.cycle.start;
        while current < ctx.cycle.end {
            let date = current.date();
            if !is_weekend(date) {
                patterns.extend(self.day_patterns(ctx, date, rng));
            }
            current += Duration::days(1);
        }
        patterns
    }

    fn day_patterns<R: Rng + ?Sized>(
        &self,
        ctx: &CycleContext<'_>,
        date: NaiveDate,
        rng: &mut R,
    ) -> Vec<CommitPattern> {
        let target = draw_commit_count(ctx.frequency, rng);
        let times = commit_times(date, target, ctx.persona, ctx.tz, rng);
        debug!(date = %date, target, scheduled = times.len(), "Scheduled day");

        times
            .into_iter()
            .map(|timestamp| {
                let category = select_category(&ctx.weights, rng);
                let spec = self.categories.spec(&category);
                let file_count = spec.draw_file_count(rng);
                let change_kind = spec.draw_change_kind(rng);
                let description = describe(&ctx.persona.templates, &ctx.cycle.focus_areas, rng);

                CommitPattern {
                    timestamp,
                    file_count,
                    change_kind,
                    category,
                    description,
                }
            })
            .collect()
    }
}

/// Saturday and Sunday, ISO days 6 and 7.
fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().number_from_monday() >= 6
}

/// Fresh random source for one generation run.
pub fn run_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
