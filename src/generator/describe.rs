//! Commit description rendering from persona templates.

use rand::seq::SliceRandom;
use rand::Rng;

/// Generic issue descriptors substituted for `{issue}`.
pub const ISSUE_VOCABULARY: &[&str] = &["memory leak", "performance", "edge case"];

/// Description used when the sprint has no focus areas.
pub const FALLBACK_DESCRIPTION: &str = "Update codebase";

/// Feature token used when a focus area has no `/`.
const DEFAULT_FEATURE: &str = "feature";

/// Split `"component/feature"` on its first `/`.
pub fn split_focus_area(area: &str) -> (&str, &str) {
    area.split_once('/').unwrap_or((area, DEFAULT_FEATURE))
}

/// Substitute every placeholder in `template`.
pub fn render_template(template: &str, component: &str, feature: &str, issue: &str) -> String {
    template
        .replace("{component}", component)
        .replace("{feature}", feature)
        .replace("{issue}", issue)
}

/// Build a description for one commit from the persona's templates and the
/// sprint's focus areas.
pub fn describe<R: Rng + ?Sized>(templates: &[String], focus_areas: &[String], rng: &mut R) -> String {
    let Some(area) = focus_areas.choose(rng) else {
        return FALLBACK_DESCRIPTION.to_string();
    };
    let (component, feature) = split_focus_area(area);

    let Some(template) = templates.choose(rng) else {
        return format!("Update {}", component);
    };

    let issue = if template.contains("{issue}") {
        ISSUE_VOCABULARY.choose(rng).copied().unwrap_or("edge case")
    } else {
        ""
    };

    render_template(template, component, feature, issue)
}
