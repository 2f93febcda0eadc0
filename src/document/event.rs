//! Events delivered to document listeners

/// Discriminant used when registering listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    PointerDown,
    PointerUp,
    PointerMove,
}

/// A keyboard event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key identifier, e.g. "Control" or "a"
    pub key: String,
    /// Auto-repeat generated while the key is held
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            repeat: false,
        }
    }
}

/// A pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// DOM button code: 0 left, 1 middle, 2 right
    pub button: i16,
    /// Client coordinates
    pub position: (f64, f64),
}

impl PointerEvent {
    pub fn new(button: i16, x: f64, y: f64) -> Self {
        Self {
            button,
            position: (x, y),
        }
    }
}

/// Anything a document can dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    PointerMove(PointerEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::KeyDown(_) => EventKind::KeyDown,
            Event::KeyUp(_) => EventKind::KeyUp,
            Event::PointerDown(_) => EventKind::PointerDown,
            Event::PointerUp(_) => EventKind::PointerUp,
            Event::PointerMove(_) => EventKind::PointerMove,
        }
    }

    /// The keyboard payload, if this is a key event
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Event::KeyDown(e) | Event::KeyUp(e) => Some(e),
            _ => None,
        }
    }

    /// The pointer payload, if this is a pointer event
    pub fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Event::PointerDown(e) | Event::PointerUp(e) | Event::PointerMove(e) => Some(e),
            _ => None,
        }
    }
}
