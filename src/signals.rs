//! Termination signals for the command line.
//!
//! A SIGINT or SIGTERM flips a watch channel instead of killing the
//! process, so the tracker can shut down and write its snapshots.

use tokio::sync::watch;
use tracing::{error, info};

/// Resolve on the first SIGTERM or SIGINT.
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}

/// Start listening for termination signals. The receiver reads `true` once
/// one has arrived.
pub fn shutdown_listener() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(()) => {
                let _ = tx.send(true);
            }
            Err(e) => {
                error!("Failed to register signal handlers: {}", e);
                // Hold the sender so receivers never see a closed channel
                tx.closed().await;
            }
        }
    });

    rx
}

/// Resolve once a termination signal has been received.
pub async fn requested(rx: &mut watch::Receiver<bool>) {
    let closed = rx.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}
