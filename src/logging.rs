//! tracing setup for the CLI.
//!
//! Everything is written to stderr so `generate --format json` can be piped
//! straight into other tools. An optional rolling file mirrors the console.

use std::fs;
use std::io::IsTerminal;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Keeps the non-blocking file writer alive; dropping it flushes pending lines.
pub struct LogGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber described by `[logging]` and the
/// `-v`/`-q` flags.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuards> {
    let level = effective_level(settings, verbose, quiet);
    let filter = crate_filter(level)?;

    let (file_layer, file_guard) = match settings.file.as_deref() {
        Some(log_file) => {
            let (layer, guard) = file_layer(Path::new(log_file), settings)?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer(settings.json_format))
        .with(file_layer)
        .init();

    tracing::debug!(
        level = %level,
        file = ?settings.file,
        json = settings.json_format,
        "Logging ready"
    );

    Ok(LogGuards {
        _file_guard: file_guard,
    })
}

/// `-q` wins over everything, then `-v`/`-vv`, then the configured level.
fn effective_level(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => level_from_str(&settings.level),
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Lenient level parsing; anything unrecognised means `info`.
fn level_from_str(value: &str) -> Level {
    let value = value.trim();
    if value.eq_ignore_ascii_case("warning") {
        return Level::WARN;
    }
    value.parse().unwrap_or(Level::INFO)
}

/// `RUST_LOG` sets the baseline for dependencies; devmetrics itself always
/// logs at `level`.
fn crate_filter(level: Level) -> Result<EnvFilter> {
    let base = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let own: Directive = format!("devmetrics={}", level)
        .parse()
        .map_err(|e| Error::config_field_invalid("logging.level", format!("{}", e)))?;

    Ok(base.add_directive(own))
}

fn stderr_layer<S>(json: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    if json {
        Box::new(layer.json().with_span_events(FmtSpan::CLOSE))
    } else {
        Box::new(layer.with_ansi(std::io::stderr().is_terminal()).compact())
    }
}

/// tracing-appender only rotates on a clock, so a small size cap is
/// approximated with hourly files.
fn rotation_for(max_file_size_mb: u64) -> Rotation {
    if (1..10).contains(&max_file_size_mb) {
        Rotation::HOURLY
    } else {
        Rotation::DAILY
    }
}

fn file_layer<S>(path: &Path, settings: &LoggingSettings) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory).map_err(|source| Error::IoWrite {
        path: directory.to_path_buf(),
        source,
    })?;

    let prefix = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("devmetrics");

    let appender = RollingFileAppender::builder()
        .rotation(rotation_for(settings.max_file_size_mb))
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(settings.max_files as usize)
        .build(directory)
        .map_err(|e| Error::Internal(format!("Cannot open log file in {}: {}", directory.display(), e)))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true);

    let layer: BoxedLayer<S> = if settings.json_format {
        Box::new(layer.json())
    } else {
        Box::new(layer)
    };
    Ok((layer, guard))
}

/// Stderr-only logging for commands that do not load the full config.
pub fn init_simple(level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(stderr_layer(false))
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))
}
