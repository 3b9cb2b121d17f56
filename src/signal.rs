use tokio_util::sync::CancellationToken;

use crate::warning;

/// Installs the interrupt handler for a run.
///
/// The first SIGINT or SIGTERM cancels the returned token, which makes the
/// run stop at its next network or store call. A second signal exits the
/// process with status 1 immediately.
pub fn install_handler() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        if wait_for_signal().await.is_err() {
            return;
        }
        warning!("Interrupt received, aborting the run. Press Ctrl+C again to exit now.");
        token.cancel();

        if wait_for_signal().await.is_ok() {
            std::process::exit(1);
        }
    });

    cancel
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
