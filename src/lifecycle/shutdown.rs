//! Termination signals that stop the daemon

use std::fmt;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::debug;

/// Which signal asked the daemon to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Terminate,
    Interrupt,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Terminate => write!(f, "SIGTERM"),
            StopReason::Interrupt => write!(f, "SIGINT"),
        }
    }
}

/// SIGTERM and SIGINT streams, registered up front so a signal that
/// arrives during startup is not lost
pub struct ShutdownSignal {
    terminate: Signal,
    interrupt: Signal,
}

impl ShutdownSignal {
    pub fn register() -> Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate()).context("failed to register SIGTERM handler")?,
            interrupt: signal(SignalKind::interrupt()).context("failed to register SIGINT handler")?,
        })
    }

    /// Resolve with the first stop signal received
    pub async fn recv(&mut self) -> StopReason {
        let reason = tokio::select! {
            _ = self.terminate.recv() => StopReason::Terminate,
            _ = self.interrupt.recv() => StopReason::Interrupt,
        };
        debug!(%reason, "stop signal");
        reason
    }
}
