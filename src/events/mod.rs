//! Events module for input dispatch and session notifications
//!
//! `InputEvent` is what clients feed in; `SessionEvent` is what the
//! event loop emits when press/release sessions open and close.

use serde::{Deserialize, Serialize};

use crate::document::{Event, KeyEvent, PointerEvent};

/// Raw input delivered by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    KeyDown {
        key: String,
        /// Auto-repeat while held
        #[serde(default)]
        repeat: bool,
    },

    KeyUp {
        key: String,
    },

    /// Pointer pressed on a named element, or the document if `target` is absent
    PointerDown {
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        button: i16,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },

    PointerUp {
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        button: i16,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },

    PointerMove {
        x: f64,
        y: f64,
    },
}

impl InputEvent {
    /// Name of the element this event is aimed at, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            InputEvent::PointerDown { target, .. } | InputEvent::PointerUp { target, .. } => {
                target.as_deref()
            }
            _ => None,
        }
    }

    /// Convert to the event delivered to document listeners
    pub fn to_event(&self) -> Event {
        match self {
            InputEvent::KeyDown { key, repeat } => Event::KeyDown(KeyEvent {
                key: key.clone(),
                repeat: *repeat,
            }),
            InputEvent::KeyUp { key } => Event::KeyUp(KeyEvent::new(key.clone())),
            InputEvent::PointerDown { button, x, y, .. } => {
                Event::PointerDown(PointerEvent::new(*button, *x, *y))
            }
            InputEvent::PointerUp { button, x, y, .. } => {
                Event::PointerUp(PointerEvent::new(*button, *x, *y))
            }
            InputEvent::PointerMove { x, y } => Event::PointerMove(PointerEvent::new(0, *x, *y)),
        }
    }
}

/// Events emitted when press/release sessions open and close
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Pointer pressed on a target
    PointerPressed { target: String },

    /// Matching pointer release observed
    PointerReleased {
        target: String,
        /// Duration in milliseconds the pointer was held
        duration_ms: u64,
    },

    /// Key pressed
    KeyPressed { key: String },

    /// The next key release after a press
    KeyReleased {
        /// Key that opened the session
        pressed: String,
        /// Key whose release closed it; may differ from `pressed`
        released: String,
        duration_ms: u64,
    },
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::PointerPressed { target } => write!(f, "POINTER_PRESSED {}", target),
            SessionEvent::PointerReleased { target, duration_ms } => {
                write!(f, "POINTER_RELEASED {} ({}ms)", target, duration_ms)
            }
            SessionEvent::KeyPressed { key } => write!(f, "KEY_PRESSED {}", key),
            SessionEvent::KeyReleased {
                pressed,
                released,
                duration_ms,
            } => write!(f, "KEY_RELEASED {}/{} ({}ms)", pressed, released, duration_ms),
        }
    }
}
