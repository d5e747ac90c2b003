//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging, filtered by `logging.level`
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use writer::Level;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.logging.level),
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Reopen log files (SIGUSR1)
pub fn reopen(config: &Config) -> std::io::Result<()> {
    match writer::get() {
        Some(w) => w.reopen(
            config.logging.access_log_file.as_deref(),
            config.logging.error_log_file.as_deref(),
        ),
        None => Ok(()),
    }
}

/// Write to info log
fn write_info(level: Level, message: &str) {
    match writer::get() {
        Some(w) if w.enabled(level) => w.write_access(message),
        Some(_) => {}
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(level: Level, message: &str) {
    match writer::get() {
        Some(w) if w.enabled(level) => w.write_error(message),
        Some(_) => {}
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info(Level::Info, "======================================");
    write_info(Level::Info, "soundshelf started successfully");
    write_info(Level::Info, &format!("Listening on: http://{addr}"));
    write_info(
        Level::Info,
        &format!("Audio directory: {}", config.library.audio_dir.display()),
    );
    write_info(Level::Info, &format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(Level::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(Level::Info, &format!("Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(Level::Info, &format!("Error log: {path}"));
    }
    write_info(Level::Info, "======================================\n");
}

pub fn log_info(message: &str) {
    write_info(Level::Info, &format!("[INFO] {message}"));
}

pub fn log_debug(message: &str) {
    write_info(Level::Debug, &format!("[DEBUG] {message}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    match writer::get() {
        Some(w) => w.write_access(&entry.format(format)),
        None => println!("{}", entry.format(format)),
    }
}

pub fn log_shutdown(active_connections: usize) {
    log_info(&format!(
        "Shutting down, {active_connections} connection(s) still in flight"
    ));
}
