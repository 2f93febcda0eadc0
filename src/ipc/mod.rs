//! IPC module for client-daemon communication

pub mod codec;
mod protocol;
mod server;

pub use protocol::{DaemonStatus, Notification, Request, Response};
pub use server::{Server, ServerContext};
