//! georef-input: press/release pairing and modifier tracking
//!
//! Library half of the daemon:
//! - A single-threaded document model with bubbling listener dispatch
//! - Modifier-key and pointer-button trackers
//! - Pointer and key press/release pairing with exactly-once release
//! - An event loop, tab relay and Unix socket IPC around them

pub mod config;
pub mod document;
pub mod events;
pub mod host;
pub mod input;
pub mod ipc;
pub mod lifecycle;
pub mod relay;
pub mod session;
