//! Log writer module
//!
//! Thread-safe log writing to files or stdout/stderr, filtered by level.
//! Log files can be reopened at runtime (after rotation).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Severity threshold, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Parse a level name; unknown names fall back to `Info`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }
}

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(File),
}

/// Thread-safe log writer
pub struct LogWriter {
    level: Level,
    /// Access and info log target
    access: Mutex<LogTarget>,
    /// Error and warning log target
    error: Mutex<LogTarget>,
}

impl LogWriter {
    fn new(
        level: Level,
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
    ) -> io::Result<Self> {
        Ok(Self {
            level,
            access: Mutex::new(open_target(access_log_file, LogTarget::Stdout)?),
            error: Mutex::new(open_target(error_log_file, LogTarget::Stderr)?),
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn write_access(&self, message: &str) {
        let mut target = self.access.lock().unwrap_or_else(PoisonError::into_inner);
        write_to_target(&mut target, message);
    }

    pub fn write_error(&self, message: &str) {
        let mut target = self.error.lock().unwrap_or_else(PoisonError::into_inner);
        write_to_target(&mut target, message);
    }

    /// Reopen both targets, e.g. after logrotate moved the files away
    pub fn reopen(&self, access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
        let access = open_target(access_log_file, LogTarget::Stdout)?;
        let error = open_target(error_log_file, LogTarget::Stderr)?;
        *self.access.lock().unwrap_or_else(PoisonError::into_inner) = access;
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = error;
        Ok(())
    }
}

fn open_target(path: Option<&str>, fallback: LogTarget) -> io::Result<LogTarget> {
    match path {
        Some(p) => Ok(LogTarget::File(open_log_file(p)?)),
        None => Ok(fallback),
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &mut LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(f) => {
            let _ = writeln!(f, "{message}");
        }
    }
}

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or init was already called.
pub fn init(level: Level, access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(level, access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// The global log writer, if `init()` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
