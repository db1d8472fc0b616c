//! Signal handling for graceful simulation shutdown.
//!
//! The first termination signal requests a stop on the shared [`ShutdownState`]; the
//! tick loop notices it before its next step, finishes delivering the step in
//! flight and prints its final report. A second signal exits immediately.

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use winger_event_system::{ShutdownState, StopReason};

/// Resolves when a termination signal arrives.
///
/// # Platform Support
///
/// * **Unix platforms**: SIGINT and SIGTERM
/// * **Windows**: Ctrl+C
pub async fn wait_for_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(windows)]
    signal::ctrl_c().await?;

    Ok(())
}

/// Watches for termination signals in the background.
///
/// The first signal requests a stop on `shutdown`; the second one ends the process
/// without waiting for the loop.
pub fn spawn_signal_watcher(shutdown: ShutdownState) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = wait_for_signal().await {
            error!("❌ Failed to install signal handlers: {}", e);
            return;
        }
        info!("📡 Received shutdown signal - finishing the current step");
        shutdown.request_stop(StopReason::Signal);

        if wait_for_signal().await.is_ok() {
            warn!("Shutdown signal received again! I'll make this quick.");
            std::process::exit(1);
        }
    })
}
