//! Sprint planner. Partitions a date range into phase-tagged sprints.
//!
//! The range is cut into fixed-length sprints (the last one truncated at the
//! range end) and the sprints are grouped into release trains. Each train
//! ramps from planning through feature work and stabilization to a release,
//! so a range that ends soon after it starts shifts straight toward release.

use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::types::{ProjectPhase, SprintCycle};

/// Focus areas used when the config does not supply its own pool.
pub const DEFAULT_FOCUS_AREAS: &[&str] = &[
    "frontend/ui",
    "frontend/forms",
    "backend/api",
    "backend/auth",
    "database/migrations",
    "database/queries",
    "infra/ci",
    "infra/deploy",
    "cli/commands",
    "docs/guides",
    "docs/changelog",
];

/// Knobs for the sprint planner
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Length of a full sprint in days
    pub length_days: u32,
    /// Sprints per release train
    pub sprints_per_release: u32,
    /// Chance that the sprint after a release is a hotfix sprint
    pub hotfix_probability: f64,
    /// Maximum absolute jitter added to a phase's base intensity
    pub intensity_jitter: f64,
    /// Pool of `component/feature` tags
    pub focus_areas: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            length_days: 14,
            sprints_per_release: 6,
            hotfix_probability: 0.1,
            intensity_jitter: 0.05,
            focus_areas: DEFAULT_FOCUS_AREAS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Generates sprint cycles for a date range.
#[derive(Debug, Clone, Default)]
pub struct SprintPlanner {
    config: PlannerConfig,
}

impl SprintPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Partition `[start, end)` into contiguous sprint cycles.
    ///
    /// Returns an empty list when `end <= start`. Cycles never overlap and
    /// leave no gaps: each cycle starts where the previous one ended.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        rng: &mut R,
    ) -> Vec<SprintCycle> {
        if end <= start {
            return Vec::new();
        }

        let spans = self.split(start, end);
        let total = spans.len();
        let per_train = self.config.sprints_per_release.max(1) as usize;

        spans
            .into_iter()
            .enumerate()
            .map(|(i, (span_start, span_end))| {
                let train = i / per_train;
                let position = i % per_train;
                let train_len = per_train.min(total - train * per_train);

                let phase = self.phase_at(position, train_len, train == 0, rng);
                let intensity = self.intensity_for(phase, rng);
                let focus_areas = self.focus_areas_for(phase, rng);

                debug!(
                    start = %span_start,
                    end = %span_end,
                    phase = %phase,
                    intensity,
                    "Planned sprint"
                );

                SprintCycle::new(span_start, span_end, phase, intensity)
                    .with_focus_areas(focus_areas)
            })
            .collect()
    }

    /// Cut the range into sprint-length spans.
    fn split(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        let length = Duration::days(i64::from(self.config.length_days.max(1)));
        let mut spans = Vec::new();
        let mut cursor = start;
        while cursor < end {
            let next = cursor.checked_add_signed(length).map_or(end, |n| n.min(end));
            spans.push((cursor, next));
            cursor = next;
        }
        spans
    }

    /// Phase of the sprint at `position` within a release train of
    /// `train_len` sprints.
    fn phase_at<R: Rng + ?Sized>(
        &self,
        position: usize,
        train_len: usize,
        first_train: bool,
        rng: &mut R,
    ) -> ProjectPhase {
        if train_len >= 2 && position == train_len - 1 {
            return ProjectPhase::Release;
        }
        if train_len >= 3 && position == train_len - 2 {
            return ProjectPhase::Stabilization;
        }
        if position == 0 {
            if first_train {
                return if train_len == 1 {
                    ProjectPhase::FeatureDevelopment
                } else {
                    ProjectPhase::Planning
                };
            }
            // Sprint right after a release
            let p = self.config.hotfix_probability.clamp(0.0, 1.0);
            return if rng.gen_bool(p) {
                ProjectPhase::Hotfix
            } else {
                ProjectPhase::Maintenance
            };
        }
        ProjectPhase::FeatureDevelopment
    }

    fn intensity_for<R: Rng + ?Sized>(&self, phase: ProjectPhase, rng: &mut R) -> f64 {
        let jitter = self.config.intensity_jitter.abs();
        let offset = if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        (phase.base_intensity() + offset).clamp(0.0, 1.0)
    }

    fn focus_areas_for<R: Rng + ?Sized>(&self, phase: ProjectPhase, rng: &mut R) -> Vec<String> {
        let pool = &self.config.focus_areas;
        if pool.is_empty() {
            return Vec::new();
        }

        let count = match phase {
            ProjectPhase::Hotfix => 1,
            _ => rng.gen_range(2..=3),
        }
        .min(pool.len());

        let mut chosen: Vec<String> = pool.choose_multiple(rng, count).cloned().collect();

        if phase == ProjectPhase::Release && !chosen.iter().any(|a| is_docs_area(a)) {
            let docs: Vec<&String> = pool.iter().filter(|a| is_docs_area(a)).collect();
            if let (Some(area), Some(last)) = (docs.choose(rng), chosen.last_mut()) {
                *last = (*area).clone();
            }
        }

        chosen
    }
}

fn is_docs_area(area: &str) -> bool {
    area.split('/').next() == Some("docs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn phases(cycles: &[SprintCycle]) -> Vec<ProjectPhase> {
        cycles.iter().map(|c| c.phase).collect()
    }

    #[test]
    fn test_empty_when_end_not_after_start() {
        let planner = SprintPlanner::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(planner.plan(day(2024, 1, 10), day(2024, 1, 10), &mut rng).is_empty());
        assert!(planner.plan(day(2024, 1, 10), day(2024, 1, 1), &mut rng).is_empty());
    }

    #[test]
    fn test_short_range_is_single_feature_cycle() {
        let planner = SprintPlanner::default();
        let mut rng = StdRng::seed_from_u64(1);
        let cycles = planner.plan(day(2024, 1, 1), day(2024, 1, 8), &mut rng);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].phase, ProjectPhase::FeatureDevelopment);
        assert_eq!(cycles[0].start, day(2024, 1, 1));
        assert_eq!(cycles[0].end, day(2024, 1, 8));
    }

    #[test]
    fn test_cycles_cover_range_without_gaps() {
        let planner = SprintPlanner::default();
        let mut rng = StdRng::seed_from_u64(7);
        let start = day(2024, 1, 1);
        let end = day(2024, 9, 17);
        let cycles = planner.plan(start, end, &mut rng);

        assert_eq!(cycles.first().unwrap().start, start);
        assert_eq!(cycles.last().unwrap().end, end);
        for pair in cycles.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for cycle in &cycles {
            assert!(cycle.end > cycle.start);
            assert!(cycle.days() <= 14);
            assert!((0.0..=1.0).contains(&cycle.intensity));
        }
    }

    #[test]
    fn test_first_train_ramps_to_release() {
        let planner = SprintPlanner::default();
        let mut rng = StdRng::seed_from_u64(3);
        // 6 sprints of 14 days
        let cycles = planner.plan(day(2024, 1, 1), day(2024, 3, 25), &mut rng);
        assert_eq!(
            phases(&cycles),
            vec![
                ProjectPhase::Planning,
                ProjectPhase::FeatureDevelopment,
                ProjectPhase::FeatureDevelopment,
                ProjectPhase::FeatureDevelopment,
                ProjectPhase::Stabilization,
                ProjectPhase::Release,
            ]
        );
    }

    #[test]
    fn test_two_sprints_start_with_planning_and_end_in_release() {
        let planner = SprintPlanner::default();
        let mut rng = StdRng::seed_from_u64(3);
        let cycles = planner.plan(day(2024, 1, 1), day(2024, 1, 20), &mut rng);
        assert_eq!(
            phases(&cycles),
            vec![ProjectPhase::Planning, ProjectPhase::Release]
        );
        assert_eq!(cycles[1].days(), 5);
    }

    #[test]
    fn test_single_sprint_is_feature_development() {
        let planner = SprintPlanner::default();
        let mut rng = StdRng::seed_from_u64(3);
        let cycles = planner.plan(day(2024, 1, 1), day(2024, 1, 8), &mut rng);
        assert_eq!(phases(&cycles), vec![ProjectPhase::FeatureDevelopment]);
    }

    #[test]
    fn test_huge_sprint_length_yields_one_cycle() {
        let planner = SprintPlanner::new(PlannerConfig {
            length_days: 4_000_000_000,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(3);
        let cycles = planner.plan(day(2024, 1, 1), day(2024, 2, 1), &mut rng);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].start, day(2024, 1, 1));
        assert_eq!(cycles[0].end, day(2024, 2, 1));
    }

    #[test]
    fn test_sprint_after_release_is_maintenance_or_hotfix() {
        let always_hotfix = SprintPlanner::new(PlannerConfig {
            hotfix_probability: 1.0,
            ..Default::default()
        });
        let never_hotfix = SprintPlanner::new(PlannerConfig {
            hotfix_probability: 0.0,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(5);
        // 7 sprints: a full train plus one
        let start = day(2024, 1, 1);
        let end = start + Duration::days(14 * 7);

        let hot = always_hotfix.plan(start, end, &mut rng);
        assert_eq!(hot[6].phase, ProjectPhase::Hotfix);
        assert_eq!(hot[6].focus_areas.len(), 1);

        let calm = never_hotfix.plan(start, end, &mut rng);
        assert_eq!(calm[6].phase, ProjectPhase::Maintenance);
    }

    #[test]
    fn test_zero_jitter_uses_base_intensity() {
        let planner = SprintPlanner::new(PlannerConfig {
            intensity_jitter: 0.0,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(9);
        let cycles = planner.plan(day(2024, 1, 1), day(2024, 3, 25), &mut rng);
        for cycle in cycles {
            assert_eq!(cycle.intensity, cycle.phase.base_intensity());
        }
    }

    #[test]
    fn test_focus_areas_distinct_and_from_pool() {
        let planner = SprintPlanner::default();
        let mut rng = StdRng::seed_from_u64(11);
        let cycles = planner.plan(day(2024, 1, 1), day(2024, 6, 1), &mut rng);
        for cycle in &cycles {
            let mut areas = cycle.focus_areas.clone();
            areas.sort();
            areas.dedup();
            assert_eq!(areas.len(), cycle.focus_areas.len());
            for area in &cycle.focus_areas {
                assert!(DEFAULT_FOCUS_AREAS.contains(&area.as_str()));
            }
            if cycle.phase == ProjectPhase::Release {
                assert!(cycle.focus_areas.iter().any(|a| a.starts_with("docs/")));
            }
        }
    }

    #[test]
    fn test_empty_pool_gives_empty_focus_areas() {
        let planner = SprintPlanner::new(PlannerConfig {
            focus_areas: vec![],
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(2);
        let cycles = planner.plan(day(2024, 1, 1), day(2024, 2, 1), &mut rng);
        assert!(cycles.iter().all(|c| c.focus_areas.is_empty()));
    }
}
