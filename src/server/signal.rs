// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGUSR1: Reopen log files

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::config::Config;
use crate::logger;

/// Signal handler state
pub struct SignalHandler {
    /// Notified once when SIGTERM or SIGINT arrives
    pub shutdown: Arc<Notify>,
    pub shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Record the request and wake the accept loop
    ///
    /// `notify_one` keeps a permit, so a loop busy accepting still sees it.
    pub fn request_shutdown(&self, reason: &str) {
        if !self.shutdown_requested.swap(true, Ordering::SeqCst) {
            logger::log_info(&format!("{reason} received, initiating graceful shutdown"));
            self.shutdown.notify_one();
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// | Signal  | Action           |
/// |---------|------------------|
/// | SIGTERM | Graceful stop    |
/// | SIGINT  | Graceful stop    |
/// | SIGUSR1 | Reopen log files |
#[cfg(unix)]
pub fn start_signal_handler(
    handler: Arc<SignalHandler>,
    config: Arc<Config>,
) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;

    logger::log_debug(&format!(
        "[SIGNAL] Handlers registered (SIGTERM, SIGINT, SIGUSR1), pid {}",
        std::process::id()
    ));

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    handler.request_shutdown("SIGTERM");
                    break;
                }
                _ = sigint.recv() => {
                    handler.request_shutdown("SIGINT");
                    break;
                }
                _ = sigusr1.recv() => {
                    match logger::reopen(&config) {
                        Ok(()) => logger::log_info("SIGUSR1 received, log files reopened"),
                        Err(e) => logger::log_error(&format!("Failed to reopen log files: {e}")),
                    }
                }
            }
        }
    });

    Ok(())
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(
    handler: Arc<SignalHandler>,
    _config: Arc<Config>,
) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            handler.request_shutdown("Ctrl+C");
        }
    });
    Ok(())
}
