//! Persona catalog: the fixed set of developer archetypes.
//!
//! Built once at startup from the bundled personas plus any `[[personas]]`
//! declared in the config file, then only read.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};

use super::types::{FrequencyClass, Persona};

/// Read-only lookup table of personas: a `Vec` plus a name→index map.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
    index: HashMap<String, usize>,
}

impl PersonaCatalog {
    /// Catalog holding only the bundled personas.
    pub fn builtin() -> Self {
        Self::from_personas(builtin_personas())
    }

    /// Bundled personas extended with `extra`. An extra persona whose name
    /// matches a bundled one replaces it.
    pub fn with_overrides(extra: &[Persona]) -> Result<Self> {
        let mut personas = builtin_personas();
        for persona in extra {
            persona
                .validate()
                .map_err(|reason| Error::persona_invalid(&persona.name, reason))?;
            match personas.iter_mut().find(|p| p.name == persona.name) {
                Some(existing) => {
                    debug!(persona = %persona.name, "Overriding bundled persona");
                    *existing = persona.clone();
                }
                None => personas.push(persona.clone()),
            }
        }
        Ok(Self::from_personas(personas))
    }

    fn from_personas(personas: Vec<Persona>) -> Self {
        let index = personas
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        Self { personas, index }
    }

    pub fn get(&self, name: &str) -> Option<&Persona> {
        self.index.get(name).map(|&i| &self.personas[i])
    }

    /// Resolve a persona by name.
    ///
    /// An empty name picks uniformly among all personas. A non-empty name
    /// the catalog does not know is an [`Error::UnknownPersona`].
    pub fn resolve<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<&Persona> {
        let name = name.trim();
        if name.is_empty() {
            let picked = &self.personas[rng.gen_range(0..self.personas.len())];
            debug!(persona = %picked.name, "Picked random persona");
            return Ok(picked);
        }

        self.get(name)
            .ok_or_else(|| Error::unknown_persona(name, self.names()))
    }

    /// Persona names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.personas.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }

    /// Personas in catalog order (bundled first, then config-defined).
    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ─────────────────────────────────────────────────────────────────
// Bundled Personas
// ─────────────────────────────────────────────────────────────────

fn weights(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(category, weight)| (category.to_string(), *weight))
        .collect()
}

fn templates(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|t| t.to_string()).collect()
}

fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona {
            name: "early_bird".to_string(),
            description: "Starts at dawn, commits often, cleans up as they go".to_string(),
            work_start_hour: 6,
            work_end_hour: 14,
            timezone: "America/New_York".to_string(),
            frequency: FrequencyClass::Frequent,
            category_weights: weights(&[
                ("refactor", 0.3),
                ("feature", 0.2),
                ("docs", 0.2),
                ("fix", 0.3),
            ]),
            templates: templates(&[
                "Refactor {component} for better maintainability",
                "Optimize {component} performance",
                "Update documentation for {component}",
            ]),
        },
        Persona {
            name: "night_owl".to_string(),
            description: "Afternoon-to-late shifts, ships features and the tests behind them"
                .to_string(),
            work_start_hour: 14,
            work_end_hour: 22,
            timezone: "America/Los_Angeles".to_string(),
            frequency: FrequencyClass::Moderate,
            category_weights: weights(&[
                ("feature", 0.4),
                ("fix", 0.3),
                ("test", 0.2),
                ("refactor", 0.1),
            ]),
            templates: templates(&[
                "Add {feature} to {component}",
                "Fix edge case in {component}",
                "Implement {feature}",
            ]),
        },
        Persona {
            name: "balanced".to_string(),
            description: "Regular office hours with an even spread of work".to_string(),
            work_start_hour: 9,
            work_end_hour: 17,
            timezone: "UTC".to_string(),
            frequency: FrequencyClass::Moderate,
            category_weights: weights(&[
                ("feature", 0.25),
                ("fix", 0.25),
                ("refactor", 0.15),
                ("test", 0.15),
                ("docs", 0.1),
                ("chore", 0.1),
            ]),
            templates: templates(&[
                "Add {feature} support in {component}",
                "Fix {issue} in {component}",
                "Clean up {component} {feature} handling",
                "Add tests for {component} {feature}",
            ]),
        },
        Persona {
            name: "contractor".to_string(),
            description: "Part-time remote contributor with few, larger commits".to_string(),
            work_start_hour: 10,
            work_end_hour: 18,
            timezone: "Europe/Berlin".to_string(),
            frequency: FrequencyClass::Sparse,
            category_weights: weights(&[("feature", 0.6), ("docs", 0.3), ("chore", 0.1)]),
            templates: templates(&[
                "Deliver {feature} for {component}",
                "Document {feature} in {component}",
                "Address {issue} reported in {component}",
            ]),
        },
    ]
}
