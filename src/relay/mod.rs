//! Open-new-tab relay
//!
//! Accepts `{"action": "openNewTab", "url": ...}` messages and asks the
//! host to open the URL. Delivery is best-effort: failures are logged,
//! never reported back to the sender.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Messages a content script can post to the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RelayMessage {
    /// Open a new browsing context at `url`
    #[serde(rename = "openNewTab")]
    OpenNewTab { url: String },

    /// Any other action; ignored
    #[serde(other)]
    Unknown,
}

/// Errors that can occur while opening a tab
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("opener command is empty")]
    NoProgram,
}

/// Something that can open a URL in a new browsing context
pub trait TabOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Opens URLs by launching an external program with the URL as its argument
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TabOpener for CommandOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        if self.program.is_empty() {
            return Err(OpenError::NoProgram);
        }

        // Not awaited: the opener outlives the request and tokio reaps it
        tokio::process::Command::new(&self.program)
            .arg(url)
            .spawn()
            .map(drop)
            .map_err(|source| OpenError::Launch {
                program: self.program.clone(),
                source,
            })
    }
}

/// Routes relay messages to a tab opener
pub struct Relay {
    opener: Box<dyn TabOpener>,
}

impl Relay {
    pub fn new(opener: impl TabOpener + 'static) -> Self {
        Self {
            opener: Box::new(opener),
        }
    }

    /// Handle one message. Never fails from the sender's point of view.
    pub fn handle(&self, message: &RelayMessage) {
        match message {
            RelayMessage::OpenNewTab { url } if url.is_empty() => {
                debug!("ignoring openNewTab without url");
            }
            RelayMessage::OpenNewTab { url } => match self.opener.open(url) {
                Ok(()) => info!(%url, "opened new tab"),
                Err(e) => warn!(%url, error = %e, "failed to open new tab"),
            },
            RelayMessage::Unknown => {
                debug!("ignoring unknown relay action");
            }
        }
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingOpener {
        opened: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl TabOpener for RecordingOpener {
        fn open(&self, url: &str) -> Result<(), OpenError> {
            self.opened.lock().unwrap().push(url.to_owned());
            if self.fail {
                Err(OpenError::NoProgram)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_message_deserialization() {
        let json = r#"{"action":"openNewTab","url":"https://example.org/maps/42"}"#;
        let message: RelayMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            message,
            RelayMessage::OpenNewTab {
                url: "https://example.org/maps/42".into()
            }
        );
    }

    #[test]
    fn test_unknown_action() {
        let json = r#"{"action":"closeTab"}"#;
        let message: RelayMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message, RelayMessage::Unknown);
    }

    #[test]
    fn test_open_new_tab_reaches_opener() {
        let opener = RecordingOpener::default();
        let relay = Relay::new(opener.clone());

        relay.handle(&RelayMessage::OpenNewTab {
            url: "https://example.org".into(),
        });
        relay.handle(&RelayMessage::Unknown);
        relay.handle(&RelayMessage::OpenNewTab { url: String::new() });

        assert_eq!(*opener.opened.lock().unwrap(), vec!["https://example.org"]);
    }

    #[test]
    fn test_open_failure_is_swallowed() {
        let opener = RecordingOpener {
            fail: true,
            ..Default::default()
        };
        let relay = Relay::new(opener.clone());

        relay.handle(&RelayMessage::OpenNewTab {
            url: "https://example.org".into(),
        });
        assert_eq!(opener.opened.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_program_is_an_error() {
        let opener = CommandOpener::new("");
        assert!(matches!(opener.open("https://example.org"), Err(OpenError::NoProgram)));
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_launch() {
        let opener = CommandOpener::new("/nonexistent/opener");
        match opener.open("https://example.org") {
            Err(OpenError::Launch { program, source }) => {
                assert_eq!(program, "/nonexistent/opener");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
