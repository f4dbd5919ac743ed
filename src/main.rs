//! devmetrics - synthetic developer activity generator
//!
//! This is the main entry point for the devmetrics binary. It loads the
//! configuration, builds the persona catalog and sprint planner, and prints
//! generated commit patterns or sprint plans.

mod cli;
mod config;
mod error;
mod generator;
mod logging;
mod output;
mod persona;
mod sprint;
mod version;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use clap::Parser;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands, ConfigSubcommand, PersonaSubcommand, RangeArgs};
use crate::config::DevmetricsConfig;
use crate::error::{Error, Result};
use crate::generator::{run_rng, CategoryTable, CommitPatternGenerator};
use crate::logging::LogGuards;
use crate::persona::PersonaCatalog;
use crate::sprint::SprintPlanner;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        debug!("{}", e.format_for_log());
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            version::print_version();
            Ok(())
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand)
        }
        Commands::Persona { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            handle_persona_command(subcommand)
        }
        Commands::Generate {
            config,
            range,
            persona,
            seed,
            format,
        } => {
            let config = DevmetricsConfig::load(config.as_deref())?;
            // Keep the guards alive until output is written
            let _log_guards = init_logging_from_config(&config, cli.verbose, cli.quiet)?;
            log_startup();

            let (start, end) = resolve_range(&range, config.generation.days)?;
            let persona = persona.or_else(|| config.generation.persona.clone()).unwrap_or_default();
            let seed = seed.or(config.generation.seed);
            let format = format.unwrap_or_else(|| config.output_format());

            let generator = build_generator(&config)?;
            let patterns = generator.generate_with_seed(start, end, &persona, seed)?;
            print!("{}", output::render_patterns(&patterns, format)?);
            Ok(())
        }
        Commands::Sprints {
            config,
            range,
            seed,
            format,
        } => {
            let config = DevmetricsConfig::load(config.as_deref())?;
            let _log_guards = init_logging_from_config(&config, cli.verbose, cli.quiet)?;
            log_startup();

            let (start, end) = resolve_range(&range, config.generation.days)?;
            let seed = seed.or(config.generation.seed);
            let format = format.unwrap_or_else(|| config.output_format());

            let planner = SprintPlanner::new(config.planner_config());
            debug!(
                length_days = planner.config().length_days,
                sprints_per_release = planner.config().sprints_per_release,
                "Planning sprints"
            );
            let cycles = planner.plan(start, end, &mut run_rng(seed));
            print!("{}", output::render_cycles(&cycles, format)?);
            Ok(())
        }
    }
}

/// Initialize logging from configuration
fn init_logging_from_config(config: &DevmetricsConfig, verbose: u8, quiet: bool) -> Result<LogGuards> {
    logging::init_logging(&config.logging, verbose, quiet)
}

fn log_startup() {
    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target = %build.target,
        profile = %build.profile,
        "Starting devmetrics"
    );
}

/// Assemble the generator from the bundled tables plus config additions
fn build_generator(config: &DevmetricsConfig) -> Result<CommitPatternGenerator> {
    Ok(CommitPatternGenerator::new(
        PersonaCatalog::with_overrides(&config.personas)?,
        CategoryTable::with_overrides(&config.categories),
        SprintPlanner::new(config.planner_config()),
    ))
}

/// Parse a `YYYY-MM-DD` flag into local midnight
fn parse_date(value: &str) -> Result<NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::invalid_date(value))
}

/// Turn `--start`/`--end`/`--days` into a half-open range.
///
/// `end` defaults to now and `start` to `end - days`. With only `--start`
/// and `--days`, the range runs forward from the start.
fn resolve_range(range: &RangeArgs, default_days: u32) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let start = range.start.as_deref().map(parse_date).transpose()?;
    let end = range.end.as_deref().map(parse_date).transpose()?;

    let (start, end) = match (start, end, range.days) {
        (Some(_), Some(_), Some(_)) => {
            return Err(Error::invalid_range(
                "--days cannot be combined with both --start and --end",
            ))
        }
        (Some(start), Some(end), None) => (start, end),
        (Some(start), None, Some(days)) => {
            let end = start
                .checked_add_signed(Duration::days(i64::from(days)))
                .ok_or_else(|| out_of_range(days))?;
            (start, end)
        }
        (Some(start), None, None) => (start, Local::now().naive_local()),
        (None, end, days) => {
            let end = end.unwrap_or_else(|| Local::now().naive_local());
            let days = days.unwrap_or(default_days);
            let start = end
                .checked_sub_signed(Duration::days(i64::from(days)))
                .ok_or_else(|| out_of_range(days))?;
            (start, end)
        }
    };

    if end <= start {
        warn!(start = %start, end = %end, "Empty date range, nothing to generate");
    }
    Ok((start, end))
}

fn out_of_range(days: u32) -> Error {
    Error::invalid_range(format!("{} days runs past the supported calendar", days))
}

/// Handle persona subcommands
fn handle_persona_command(subcommand: PersonaSubcommand) -> Result<()> {
    match subcommand {
        PersonaSubcommand::List { config, format } => {
            let cfg = DevmetricsConfig::load(config.as_deref())?;
            let catalog = PersonaCatalog::with_overrides(&cfg.personas)?;
            print!("{}", output::render_persona_list(catalog.iter(), format)?);
        }
        PersonaSubcommand::Show {
            name,
            config,
            format,
        } => {
            let cfg = DevmetricsConfig::load(config.as_deref())?;
            let catalog = PersonaCatalog::with_overrides(&cfg.personas)?;
            let persona = catalog
                .get(&name)
                .ok_or_else(|| Error::unknown_persona(&name, catalog.names()))?;
            print!("{}", output::render_persona(persona, format)?);
        }
    }
    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = DevmetricsConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", written.display());
        }
        ConfigSubcommand::Validate { config } => {
            let cfg = DevmetricsConfig::load(config.as_deref())?;
            let generator = build_generator(&cfg)?;
            println!(
                "Configuration is valid ({} personas, default format {}).",
                generator.catalog().len(),
                cfg.output_format()
            );
        }
    }
    Ok(())
}
