//! Logging
//!
//! Records go both to the terminal, with coloured level tags, and to the
//! session's log file, where the tags are left plain so the file stays
//! readable in any editor. Every line is stamped with the session clock.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use std::fmt::{Arguments, Display};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Least verbose level the logger accepts. Lifecycle messages are logged at
/// `Info` and must always reach the log file.
const LEAST_VERBOSE: LevelFilter = LevelFilter::Info;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors installing the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The log level must be at least `Info`, found `{0}`")]
    LevelTooLow(LevelFilter),

    #[error("Could not open the log file: {0}")]
    LogFile(std::io::Error),

    #[error("A logger is already installed: {0}")]
    AlreadyInstalled(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Install the logger for this session.
///
/// Must only be called once per process.
pub fn logger_init(
    min_level: LevelFilter,
    session: &Session
) -> Result<(), LoggerInitError> {

    if min_level < LEAST_VERBOSE {
        return Err(LoggerInitError::LevelTooLow(min_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFile)?;

    let terminal = fern::Dispatch::new()
        .format(|out, message, record| {
            finish_line(out, coloured_tag(record.level()), message, record)
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            finish_line(out, plain_tag(record.level()), message, record)
        })
        .chain(log_file);

    fern::Dispatch::new()
        .level(min_level)
        // The console's line editor is very chatty at debug
        .level_for("rustyline", LevelFilter::Info)
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::AlreadyInstalled)?;

    info!("Logging initialised for {}", session.exec_name);
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn finish_line<T: Display>(
    out: fern::FormatCallback,
    tag: T,
    message: &Arguments,
    record: &Record
) {
    let time_s = session::get_elapsed_seconds();

    // Targets only help when debugging
    if record.level() > Level::Info {
        out.finish(format_args!(
            "[{:10.6} {}] {}: {}",
            time_s,
            tag,
            record.target(),
            message
        ))
    }
    else {
        out.finish(format_args!("[{:10.6} {}] {}", time_s, tag, message))
    }
}

fn plain_tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info  => "INF",
        Level::Warn  => "WRN",
        Level::Error => "ERR"
    }
}

fn coloured_tag(level: Level) -> ColoredString {
    let tag = plain_tag(level);

    match level {
        Level::Trace => tag.dimmed().italic(),
        Level::Debug => tag.dimmed(),
        Level::Info  => tag.normal(),
        Level::Warn  => tag.yellow(),
        Level::Error => tag.red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rejects_quiet_levels() {
        let session = Session {
            exec_name: String::from("test_exec"),
            session_root: PathBuf::new(),
            arch_root: PathBuf::new(),
            log_file_path: PathBuf::new(),
        };

        assert!(matches!(
            logger_init(LevelFilter::Warn, &session),
            Err(LoggerInitError::LevelTooLow(LevelFilter::Warn))
        ));
        assert!(matches!(
            logger_init(LevelFilter::Off, &session),
            Err(LoggerInitError::LevelTooLow(LevelFilter::Off))
        ));
    }

    #[test]
    fn test_tags_are_three_letters() {
        for level in [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error].iter() {
            assert_eq!(plain_tag(*level).len(), 3);
        }
    }
}
