//! Shutdown signal plumbing.

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl-C).
///
/// When the signal is received, cancels the provided token so every
/// poll and retry loop aborts within one interval. The token guards
/// against repeated signals: cancelling an already-cancelled token is a
/// no-op, so termination runs exactly once.
pub async fn wait_for_shutdown_signal(token: CancellationToken) -> Result<(), std::io::Error> {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        tokio::select! {
            _ = ctrl_c => {
                info!("received SIGINT, shutting down");
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        match ctrl_c.await {
            Ok(()) => {
                info!("received Ctrl-C, shutting down");
            }
            Err(e) => {
                tracing::error!("Ctrl-C signal handler failed, shutting down anyway: {e}");
            }
        }
    }

    token.cancel();
    Ok(())
}
