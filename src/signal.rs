//! Signal handling module
//!
//! Listens for termination signals and stops the server through the
//! [`ShutdownHandle`] passed in at startup.
//!
//! Supported signals:
//! - SIGINT:  Graceful shutdown (Ctrl+C)
//! - SIGTERM: Graceful shutdown

use crate::logger;
use crate::server::ShutdownHandle;

/// Spawn a background task that stops the server on SIGINT/SIGTERM (Unix).
#[cfg(unix)]
pub fn spawn_signal_listener(handle: ShutdownHandle) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGINT handler: {e}"));
                return;
            }
        };
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
                return;
            }
        };

        // Keep listening after a stop: a signal that lands before the
        // server is running makes stop() a no-op, and tokio's installed
        // handler consumes SIGINT/SIGTERM for the rest of the process
        // lifetime, so a one-shot task would leave the server unstoppable.
        loop {
            tokio::select! {
                _ = sigint.recv() => logger::log_signal("SIGINT"),
                _ = sigterm.recv() => logger::log_signal("SIGTERM"),
            }

            handle.stop();
        }
    });
}

/// Non-Unix fallback - only handles Ctrl+C.
#[cfg(not(unix))]
pub fn spawn_signal_listener(handle: ShutdownHandle) {
    tokio::spawn(async move {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    logger::log_signal("Ctrl+C");
                    handle.stop();
                }
                Err(e) => {
                    logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
                    return;
                }
            }
        }
    });
}
