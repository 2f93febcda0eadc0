//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::events::{InputEvent, SessionEvent};
use crate::host::InputSnapshot;
use crate::relay::RelayMessage;

/// Requests from clients to the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Request current daemon status
    GetStatus,

    /// Feed an input event into the event loop
    Dispatch { event: InputEvent },

    /// Ask whether a modifier key is held
    IsPressed { key: String },

    /// Ping to check connectivity
    Ping,

    /// Subscribe to session event notifications
    Subscribe,

    /// Pass a message to the tab relay
    Relay { message: RelayMessage },
}

/// Responses from daemon to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Current daemon status
    Status(DaemonStatus),

    /// Input event queued
    Accepted,

    /// Held state of a modifier key
    Pressed { key: String, pressed: bool },

    /// Pong response to ping
    Pong,

    /// Subscription confirmed
    Subscribed,

    /// Relay message taken; carries no outcome
    Relayed,

    /// Error response
    Error { code: String, message: String },
}

impl Response {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_owned(),
            message: message.into(),
        }
    }
}

/// Push notification from daemon to subscribed clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A press/release session opened or closed
    SessionEvent { event: SessionEvent },
}

/// Full daemon status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonStatus {
    /// Daemon version
    pub version: String,

    /// Tracker state at the time of the request
    pub input: InputSnapshot,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

impl Default for DaemonStatus {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            input: InputSnapshot::default(),
            uptime_secs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = Request::IsPressed { key: "Control".into() };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("is_pressed"));
        assert!(json.contains("Control"));
    }

    #[test]
    fn test_relay_request_deserialization() {
        let json = r#"{"type":"relay","message":{"action":"openNewTab","url":"https://example.org"}}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        match req {
            Request::Relay {
                message: RelayMessage::OpenNewTab { url },
            } => assert_eq!(url, "https://example.org"),
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_request_deserialization() {
        let json = r#"{"type":"dispatch","event":{"type":"key_down","key":"Alt"}}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        assert!(matches!(
            req,
            Request::Dispatch {
                event: InputEvent::KeyDown { .. }
            }
        ));
    }

    #[test]
    fn test_response_serialization() {
        let resp = Response::Status(DaemonStatus::default());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("status"));
        assert!(json.contains("modifiers"));
    }
}
