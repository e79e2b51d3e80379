//! FILENAME: app/report-cli/src/logging.rs
// PURPOSE: Unified logging for the report runner.
// CONTEXT: Every record from the `log` facade becomes one `seq|L|target|message`
// line on stderr, and in the log file when one was requested. Stdout is kept
// for report output.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;

use crate::error::CliError;

/// Environment variable that overrides the level chosen by `--verbose`.
pub const LOG_ENV: &str = "REPORT_LOG";

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

static LOGGER: UnifiedLogger = UnifiedLogger;

pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

fn level_code(level: Level) -> &'static str {
    match level {
        Level::Error => "E",
        Level::Warn => "W",
        Level::Info => "I",
        Level::Debug => "D",
        Level::Trace => "T",
    }
}

pub fn format_line(seq: u64, level: Level, category: &str, message: &str) -> String {
    format!("{}|{}|{}|{}", seq, level_code(level), category, message)
}

/// Write a log line in unified format
pub fn write_log(level: Level, category: &str, message: &str) {
    let line = format_line(next_seq(), level, category, message);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            if let Err(e) = writeln!(file, "{}", line) {
                eprintln!("[LOG_ERROR] Failed to write: {}", e);
            }
            let _ = file.flush();
        }
    }

    eprintln!("{}", line);
}

/// Level from `--verbose` count, unless `REPORT_LOG` names one.
pub fn resolve_level(verbose: u8, env: Option<&str>) -> LevelFilter {
    if let Some(level) = env.and_then(|v| v.trim().parse::<LevelFilter>().ok()) {
        return level;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

struct UnifiedLogger;

impl Log for UnifiedLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            write_log(record.level(), record.target(), &record.args().to_string());
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

/// Install the unified logger. Truncates `log_file` when given.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<(), CliError> {
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| CliError::Logging(format!("Failed to create log file {:?}: {}", path, e)))?;
        let mut guard = LOG_FILE
            .lock()
            .map_err(|e| CliError::Logging(format!("Lock error: {}", e)))?;
        *guard = Some(file);
    }

    log::set_logger(&LOGGER).map_err(|e| CliError::Logging(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        assert_eq!(
            format_line(7, Level::Warn, "report_engine::table", "bad cell"),
            "7|W|report_engine::table|bad cell"
        );
    }

    #[test]
    fn test_sequence_increases() {
        let a = next_seq();
        let b = next_seq();
        assert!(b > a);
    }

    #[test]
    fn test_resolve_level() {
        assert_eq!(resolve_level(0, None), LevelFilter::Warn);
        assert_eq!(resolve_level(2, None), LevelFilter::Debug);
        assert_eq!(resolve_level(9, None), LevelFilter::Trace);
        assert_eq!(resolve_level(0, Some("debug")), LevelFilter::Debug);
        // Unparseable values fall back to the flag
        assert_eq!(resolve_level(1, Some("loud")), LevelFilter::Info);
    }
}
