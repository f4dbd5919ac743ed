//! Commit-time allocation within a persona's working day.
//!
//! A day is modelled as the list of minute slots inside the work window,
//! minus the lunch hour and any local times the timezone skips. Commit
//! times are a random sample of distinct slots, so the request count is
//! capped by what the day can hold and allocation always terminates.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::persona::{FrequencyClass, Persona};

/// Parse the persona's timezone, falling back to UTC for unknown names.
pub fn persona_timezone(persona: &Persona) -> Tz {
    persona.timezone.parse::<Tz>().unwrap_or_else(|_| {
        warn!(
            persona = %persona.name,
            timezone = %persona.timezone,
            "Unknown timezone, using UTC"
        );
        Tz::UTC
    })
}

/// Draw the number of commits for one day, uniformly from the class range.
pub fn draw_commit_count<R: Rng + ?Sized>(frequency: FrequencyClass, rng: &mut R) -> u32 {
    let (lo, hi) = frequency.commit_range();
    rng.gen_range(lo..=hi)
}

/// Minutes of the day (0..1440) on which a commit may land.
pub fn available_slots(date: NaiveDate, persona: &Persona, tz: Tz) -> Vec<u32> {
    let start = persona.work_start_hour;
    let end = persona.work_end_hour.min(24);
    if start >= end {
        return Vec::new();
    }
    let lunch = persona.lunch_hour();

    (start * 60..end * 60)
        .filter(|minute| minute / 60 != lunch)
        .filter(|minute| {
            date.and_hms_opt(minute / 60, minute % 60, 0)
                .map(|naive| tz.from_local_datetime(&naive).earliest().is_some())
                .unwrap_or(false)
        })
        .collect()
}

/// Pick up to `count` distinct commit minutes on `date`, with second-level
/// jitter, in ascending order.
pub fn commit_times<R: Rng + ?Sized>(
    date: NaiveDate,
    count: u32,
    persona: &Persona,
    tz: Tz,
    rng: &mut R,
) -> Vec<DateTime<Tz>> {
    let mut slots = available_slots(date, persona, tz);
    let count = (count as usize).min(slots.len());

    let (picked, _) = slots.partial_shuffle(rng, count);
    let mut picked = picked.to_vec();
    picked.sort_unstable();

    picked
        .into_iter()
        .filter_map(|minute| {
            let second = rng.gen_range(0..60);
            let naive = date.and_hms_opt(minute / 60, minute % 60, second)?;
            tz.from_local_datetime(&naive).earliest()
        })
        .collect()
}
