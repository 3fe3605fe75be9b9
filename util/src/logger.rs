//! Logging setup
//!
//! Two outputs are configured: a coloured terminal output at the requested
//! level and a plain session log file which also keeps debug messages. Both
//! are stamped with the seconds since the session epoch so that log lines
//! match up with the archive records of the same session.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The session log file never records less than this level.
const FILE_MIN_LEVEL: LevelFilter = LevelFilter::Debug;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Terminal log level must include `INFO` messages, got `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Could not open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been installed: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Install the global logger for this session.
///
/// `min_level` sets the terminal output and must be `Info` or more verbose,
/// leg and mode changes are logged at `Info`. The log file records at
/// `min_level` or `Debug`, whichever is more verbose.
///
/// Only one logger can be installed per process, a second call fails with
/// [`LoggerInitError::FernInitError`].
pub fn logger_init(min_level: LevelFilter, session: &Session) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file =
        fern::log_file(&session.log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    let terminal = fern::Dispatch::new()
        .format(|out, message, record| {
            // Targets are only useful when looking at the detailed levels
            if record.level() > Level::Info {
                out.finish(format_args!(
                    "[{:10.6} {}] {}: {}",
                    session::get_elapsed_seconds(),
                    coloured_tag(record.level()),
                    record.target(),
                    message
                ))
            }
            else {
                out.finish(format_args!(
                    "[{:10.6} {}] {}",
                    session::get_elapsed_seconds(),
                    coloured_tag(record.level()),
                    message
                ))
            }
        })
        .level(min_level)
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}: {}",
                session::get_elapsed_seconds(),
                tag(record.level()),
                record.target(),
                message
            ))
        })
        .level(min_level.max(FILE_MIN_LEVEL))
        .chain(log_file);

    fern::Dispatch::new()
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Terminal level: {:?}", min_level);
    info!("    Log file: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Three letter tag for a log level
fn tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info => "INF",
        Level::Warn => "WRN",
        Level::Error => "ERR",
    }
}

fn coloured_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => tag(level).dimmed().italic(),
        Level::Debug => tag(level).dimmed(),
        Level::Info => tag(level).normal(),
        Level::Warn => tag(level).yellow(),
        Level::Error => tag(level).red().bold(),
    }
}
