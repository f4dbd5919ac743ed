//! Configuration system for devmetrics
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (DEVMETRICS_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::generator::CategorySpec;
use crate::output::OutputFormat;
use crate::persona::Persona;
use crate::sprint::{PlannerConfig, DEFAULT_FOCUS_AREAS};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevmetricsConfig {
    /// Defaults for `generate`
    pub generation: GenerationSettings,

    /// Sprint planner settings
    pub sprints: SprintSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// Extra personas, merged into the bundled catalog
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub personas: Vec<Persona>,

    /// Category table additions and overrides
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, CategorySpec>,
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Days of history to generate when no explicit range is given
    pub days: u32,

    /// Persona to use (unset = random)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,

    /// Seed for reproducible runs (unset = OS entropy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Output format: text, json
    pub format: String,
}

/// Sprint planner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintSettings {
    /// Length of a sprint in days
    pub length_days: u32,

    /// Sprints per release train
    pub sprints_per_release: u32,

    /// Chance that the sprint after a release is a hotfix sprint (0.0-1.0)
    pub hotfix_probability: f64,

    /// Maximum jitter applied to phase intensity (0.0-1.0)
    pub intensity_jitter: f64,

    /// Pool of `component/feature` focus areas (empty = bundled pool)
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            days: 7,
            persona: None,
            seed: None,
            format: "text".to_string(),
        }
    }
}

impl Default for SprintSettings {
    fn default() -> Self {
        Self {
            length_days: 14,
            sprints_per_release: 6,
            hotfix_probability: 0.1,
            intensity_jitter: 0.05,
            focus_areas: vec![],
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl From<&SprintSettings> for PlannerConfig {
    fn from(settings: &SprintSettings) -> Self {
        let focus_areas = if settings.focus_areas.is_empty() {
            DEFAULT_FOCUS_AREAS.iter().map(|s| s.to_string()).collect()
        } else {
            settings.focus_areas.clone()
        };
        Self {
            length_days: settings.length_days,
            sprints_per_release: settings.sprints_per_release,
            hotfix_probability: settings.hotfix_probability,
            intensity_jitter: settings.intensity_jitter,
            focus_areas,
        }
    }
}

impl DevmetricsConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match Self::find_config_file(config_path)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading configuration file");
        let content = fs::read_to_string(path).map_err(|source| Error::IoRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e),
            source: Some(e),
        })?;
        info!(path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // An explicit path must exist
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        let search_paths = [
            PathBuf::from("devmetrics.toml"),
            dirs::config_dir()
                .map(|p| p.join("devmetrics").join("config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".devmetrics").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Generation settings
        if let Ok(val) = std::env::var("DEVMETRICS_DAYS") {
            if let Ok(n) = val.parse() {
                self.generation.days = n;
            }
        }
        if let Ok(val) = std::env::var("DEVMETRICS_PERSONA") {
            self.generation.persona = Some(val);
        }
        if let Ok(val) = std::env::var("DEVMETRICS_SEED") {
            if let Ok(n) = val.parse() {
                self.generation.seed = Some(n);
            }
        }
        if let Ok(val) = std::env::var("DEVMETRICS_FORMAT") {
            self.generation.format = val;
        }

        // Sprint settings
        if let Ok(val) = std::env::var("DEVMETRICS_SPRINT_LENGTH_DAYS") {
            if let Ok(n) = val.parse() {
                self.sprints.length_days = n;
            }
        }
        if let Ok(val) = std::env::var("DEVMETRICS_HOTFIX_PROBABILITY") {
            if let Ok(p) = val.parse() {
                self.sprints.hotfix_probability = p;
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("DEVMETRICS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("DEVMETRICS_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("DEVMETRICS_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.generation.days == 0 {
            return Err(Error::config_field_invalid(
                "generation.days",
                "days must be at least 1",
            ));
        }
        if self.generation.format.parse::<OutputFormat>().is_err() {
            return Err(Error::config_field_invalid(
                "generation.format",
                format!(
                    "Invalid output format '{}'. Must be one of: text, json",
                    self.generation.format
                ),
            ));
        }

        if self.sprints.length_days == 0 {
            return Err(Error::config_field_invalid(
                "sprints.length_days",
                "length_days must be at least 1",
            ));
        }
        if self.sprints.sprints_per_release == 0 {
            return Err(Error::config_field_invalid(
                "sprints.sprints_per_release",
                "sprints_per_release must be at least 1",
            ));
        }
        for (field, value) in [
            ("sprints.hotfix_probability", self.sprints.hotfix_probability),
            ("sprints.intensity_jitter", self.sprints.intensity_jitter),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config_field_invalid(
                    field,
                    format!("{} must be between 0.0 and 1.0 (got {})", field, value),
                ));
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        for persona in &self.personas {
            persona
                .validate()
                .map_err(|reason| Error::persona_invalid(&persona.name, reason))?;
        }

        for (name, spec) in &self.categories {
            if spec.min_files == 0 || spec.max_files < spec.min_files {
                return Err(Error::config_field_invalid(
                    format!("categories.{}", name),
                    format!(
                        "file range must satisfy 1 <= min_files <= max_files (got {}-{})",
                        spec.min_files, spec.max_files
                    ),
                ));
            }
            if spec.kinds.is_empty() {
                return Err(Error::config_field_invalid(
                    format!("categories.{}", name),
                    "kinds cannot be empty",
                ));
            }
        }

        Ok(())
    }

    /// Planner settings derived from `[sprints]`
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig::from(&self.sprints)
    }

    /// Parsed output format
    pub fn output_format(&self) -> OutputFormat {
        self.generation.format.parse().unwrap_or_default()
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Default location written by `config init`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".devmetrics")
        .join("config.toml")
}

/// Initialize a new configuration file, returning where it was written
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| Error::IoWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(&config_path, generate_default_config()).map_err(|source| Error::IoWrite {
        path: config_path.clone(),
        source,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
pub fn generate_default_config() -> String {
    r#"# devmetrics configuration

[generation]
# Days of history to generate when --start/--end are not given
days = 7

# Persona to use (comment out to pick one at random per run)
# persona = "balanced"

# Seed for reproducible output (comment out for a fresh run every time)
# seed = 42

# Output format: text, json
format = "text"

[sprints]
# Length of a sprint in days
length_days = 14

# Sprints per release train
sprints_per_release = 6

# Chance that the sprint after a release is a hotfix sprint (0.0-1.0)
hotfix_probability = 0.1

# Maximum jitter applied to phase intensity (0.0-1.0)
intensity_jitter = 0.05

# Pool of component/feature focus areas (empty = bundled pool)
focus_areas = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.devmetrics/logs/devmetrics.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

# Extra personas. A persona with a bundled name replaces the bundled one.
#
# [[personas]]
# name = "weekend_hacker"
# description = "Short bursts of work in the late afternoon"
# work_start_hour = 15
# work_end_hour = 20
# timezone = "Europe/London"
# frequency = "sparse"
# templates = ["Add {feature} to {component}", "Fix {issue} in {component}"]
#
# [personas.category_weights]
# feature = 0.7
# fix = 0.3

# Category overrides
#
# [categories.perf]
# min_files = 1
# max_files = 3
# kinds = ["optimize_query", "add_cache"]
"#
    .to_string()
}
