//! Process lifecycle: signal-driven shutdown

mod shutdown;

pub use shutdown::{ShutdownSignal, StopReason};
