//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for devmetrics.

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// devmetrics - synthetic developer activity generator
///
/// Produces realistic commit timelines for a developer persona: when each
/// commit lands, what kind of change it is, how many files it touches and
/// a one-line description. Sprint cycles shape the cadence and the mix.
#[derive(Parser, Debug)]
#[command(name = "devmetrics")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Date range selection shared by `generate` and `sprints`
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Day after the last day of the range (YYYY-MM-DD, default: now)
    #[arg(long)]
    pub end: Option<String>,

    /// Days to count back from the end when --start is not given
    #[arg(short, long)]
    pub days: Option<u32>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate commit patterns for a date range
    Generate {
        /// Path to configuration file
        #[arg(short, long, env = "DEVMETRICS_CONFIG")]
        config: Option<String>,

        #[command(flatten)]
        range: RangeArgs,

        /// Persona to simulate (omit to pick one at random)
        #[arg(short, long)]
        persona: Option<String>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show the sprint plan for a date range
    Sprints {
        /// Path to configuration file
        #[arg(short, long, env = "DEVMETRICS_CONFIG")]
        config: Option<String>,

        #[command(flatten)]
        range: RangeArgs,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Inspect the persona catalog
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version and build information
    Version,
}

/// Persona subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// List bundled and configured personas
    List {
        /// Path to configuration file
        #[arg(short, long, env = "DEVMETRICS_CONFIG")]
        config: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show one persona in detail
    Show {
        /// Persona name
        name: String,

        /// Path to configuration file
        #[arg(short, long, env = "DEVMETRICS_CONFIG")]
        config: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
