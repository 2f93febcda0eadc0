//! georef-input-daemon: input pairing daemon
//!
//! Runs in the background and provides:
//! - An event loop tracking modifier keys and pointer buttons
//! - Press/release session notifications with held durations
//! - An open-new-tab relay
//! - IPC server for clients feeding input and subscribing to sessions

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use georef_input::config::Config;
use georef_input::events::SessionEvent;
use georef_input::host::EventLoop;
use georef_input::ipc::{Server, ServerContext};
use georef_input::lifecycle::ShutdownSignal;
use georef_input::relay::{CommandOpener, Relay};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "georef-input-daemon starting"
    );

    // Load configuration
    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(
        ?config.socket_path,
        active_class = ?config.active_class,
        opener = %config.opener,
        "configuration loaded"
    );

    let mut shutdown = ShutdownSignal::register()?;

    // IPC clients -> event loop
    let (command_tx, command_rx) = mpsc::channel(64);
    // Event loop -> subscribers
    let (event_tx, _event_rx) = broadcast::channel::<SessionEvent>(64);

    let mut event_loop = EventLoop::new(event_tx.clone(), config.active_class.clone());
    let relay = Relay::new(CommandOpener::new(config.opener.clone()));

    let server = Server::new(
        &config.socket_path,
        ServerContext::new(command_tx, event_tx.clone(), relay),
    )?;

    let mut log_rx = event_tx.subscribe();

    info!("daemon initialized, entering main loop");

    tokio::select! {
        // Run the event loop (processes queued commands)
        _ = event_loop.run(command_rx) => {
            info!("event loop exited");
        }

        // Run the IPC server (accepts client connections)
        result = server.run() => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        // Log session events
        _ = async {
            loop {
                match log_rx.recv().await {
                    Ok(event) => debug!(%event, "session event"),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "session event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        } => {
            info!("session event logger exited");
        }

        // Wait for shutdown signal
        reason = shutdown.recv() => {
            info!(%reason, "shutdown signal received");
        }
    }

    info!("shutting down...");

    server.shutdown().await;

    info!("georef-input-daemon stopped");

    Ok(())
}
