//! Rendering of generated data for stdout.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::generator::CommitPattern;
use crate::persona::Persona;
use crate::sprint::SprintCycle;

/// Output format for `generate` and friends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, human-readable lines
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format '{}'", other)),
        }
    }
}

/// Render commit patterns, one per line in text mode.
pub fn render_patterns(patterns: &[CommitPattern], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(patterns)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for p in patterns {
                let _ = writeln!(
                    out,
                    "{}  {:<8}  {:<24}  {:>2} file{}  {}",
                    p.timestamp.format("%Y-%m-%d %H:%M:%S %:z"),
                    p.category,
                    p.change_kind,
                    p.file_count,
                    if p.file_count == 1 { " " } else { "s" },
                    p.description
                );
            }
            let _ = writeln!(out, "{} commits", patterns.len());
            Ok(out)
        }
    }
}

/// Render a sprint plan.
pub fn render_cycles(cycles: &[SprintCycle], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(cycles)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for (i, c) in cycles.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "#{:<3} {} .. {} {:>3}d  {:<20} intensity {:.2}  [{}]",
                    i + 1,
                    c.start.format("%Y-%m-%d"),
                    c.end.format("%Y-%m-%d"),
                    c.days(),
                    c.phase.as_str(),
                    c.intensity,
                    c.focus_areas.join(", ")
                );
            }
            Ok(out)
        }
    }
}

/// Render the persona catalog as a short listing.
pub fn render_persona_list<'a>(
    personas: impl Iterator<Item = &'a Persona>,
    format: OutputFormat,
) -> Result<String> {
    let mut personas: Vec<&Persona> = personas.collect();
    personas.sort_by(|a, b| a.name.cmp(&b.name));

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&personas)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for p in personas {
                let _ = writeln!(
                    out,
                    "{:<14} {:02}:00-{:02}:00  {:<20} {:<9} {}",
                    p.name,
                    p.work_start_hour,
                    p.work_end_hour,
                    p.timezone,
                    p.frequency.as_str(),
                    p.description
                );
            }
            Ok(out)
        }
    }
}

/// Render one persona in full.
pub fn render_persona(persona: &Persona, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(persona)?),
        OutputFormat::Text => {
            let (lo, hi) = persona.frequency.commit_range();
            let mut out = String::new();
            let _ = writeln!(out, "Name:        {}", persona.name);
            if !persona.description.is_empty() {
                let _ = writeln!(out, "Description: {}", persona.description);
            }
            let _ = writeln!(
                out,
                "Hours:       {:02}:00-{:02}:00 {} (lunch {:02}:00)",
                persona.work_start_hour,
                persona.work_end_hour,
                persona.timezone,
                persona.lunch_hour()
            );
            let _ = writeln!(
                out,
                "Frequency:   {} ({}-{} commits/day)",
                persona.frequency, lo, hi
            );
            let _ = writeln!(out, "Weights:");
            for (category, weight) in &persona.category_weights {
                let _ = writeln!(out, "  {:<10} {:.2}", category, weight);
            }
            let _ = writeln!(out, "Templates:");
            for template in &persona.templates {
                let _ = writeln!(out, "  {}", template);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaCatalog;
    use crate::sprint::ProjectPhase;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Tz;

    fn sample_pattern() -> CommitPattern {
        let tz: Tz = "Europe/Berlin".parse().unwrap();
        CommitPattern {
            timestamp: tz.with_ymd_and_hms(2024, 7, 2, 11, 5, 30).unwrap(),
            file_count: 1,
            change_kind: "update_docs".to_string(),
            category: "docs".to_string(),
            description: "Document api".to_string(),
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_text_patterns() {
        let out = render_patterns(&[sample_pattern()], OutputFormat::Text).unwrap();
        assert!(out.starts_with("2024-07-02 11:05:30 +02:00  docs"));
        assert!(out.contains("update_docs"));
        assert!(out.contains("Document api"));
        assert!(out.trim_end().ends_with("1 commits"));
    }

    #[test]
    fn test_json_patterns_is_array() {
        let out = render_patterns(&[sample_pattern()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["timezone"], "Europe/Berlin");
    }

    #[test]
    fn test_text_cycles() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let cycle = SprintCycle::new(start, start + chrono::Duration::days(14), ProjectPhase::Release, 0.95)
            .with_focus_areas(["docs/changelog"]);
        let out = render_cycles(&[cycle], OutputFormat::Text).unwrap();
        assert!(out.contains("2024-01-01 .. 2024-01-15"));
        assert!(out.contains("release"));
        assert!(out.contains("docs/changelog"));
    }

    #[test]
    fn test_persona_list_sorted() {
        let catalog = PersonaCatalog::builtin();
        let out = render_persona_list(catalog.iter(), OutputFormat::Text).unwrap();
        let names: Vec<&str> = out.lines().filter_map(|l| l.split_whitespace().next()).collect();
        assert_eq!(names, vec!["balanced", "contractor", "early_bird", "night_owl"]);
    }

    #[test]
    fn test_persona_show_text() {
        let catalog = PersonaCatalog::builtin();
        let out = render_persona(catalog.get("early_bird").unwrap(), OutputFormat::Text).unwrap();
        assert!(out.contains("06:00-14:00 America/New_York (lunch 10:00)"));
        assert!(out.contains("frequent (8-15 commits/day)"));
    }
}
