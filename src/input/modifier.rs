//! Modifier key definitions and state tracking
//!
//! The set of tracked keys is closed: Control, Meta, Alt and Shift.
//! Any other key name is ignored by the tracker and never reads as held.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::document::{Document, EventKind, KeyEvent, ListenerId, Target};

/// One of the tracked modifier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Control,
    Meta,
    Alt,
    Shift,
}

impl ModifierKey {
    pub const ALL: [ModifierKey; 4] = [
        ModifierKey::Control,
        ModifierKey::Meta,
        ModifierKey::Alt,
        ModifierKey::Shift,
    ];

    /// Key identifier as reported by keyboard events
    pub fn name(&self) -> &'static str {
        match self {
            ModifierKey::Control => "Control",
            ModifierKey::Meta => "Meta",
            ModifierKey::Alt => "Alt",
            ModifierKey::Shift => "Shift",
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A key name outside the tracked set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a modifier key: {0:?}")]
pub struct UnknownKey(pub String);

impl FromStr for ModifierKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModifierKey::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownKey(s.to_owned()))
    }
}

/// Which modifier keys are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierState {
    /// Control key is held
    pub control: bool,
    /// Meta (Command/Windows) key is held
    pub meta: bool,
    /// Alt/Option key is held
    pub alt: bool,
    /// Shift key is held
    pub shift: bool,
}

impl ModifierState {
    pub fn get(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Control => self.control,
            ModifierKey::Meta => self.meta,
            ModifierKey::Alt => self.alt,
            ModifierKey::Shift => self.shift,
        }
    }

    pub fn set(&mut self, key: ModifierKey, held: bool) {
        let slot = match key {
            ModifierKey::Control => &mut self.control,
            ModifierKey::Meta => &mut self.meta,
            ModifierKey::Alt => &mut self.alt,
            ModifierKey::Shift => &mut self.shift,
        };
        *slot = held;
    }

    /// Check if all modifiers are released
    pub fn is_empty(&self) -> bool {
        !self.control && !self.meta && !self.alt && !self.shift
    }
}

/// Stateful modifier tracker fed by key-down/key-up events
#[derive(Debug, Default)]
pub struct ModifierKeys {
    state: ModifierState,
}

impl ModifierKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the named key is held. Unknown names are never held.
    pub fn is(&self, key: &str) -> bool {
        key.parse::<ModifierKey>()
            .map(|k| self.is_key(k))
            .unwrap_or(false)
    }

    pub fn is_key(&self, key: ModifierKey) -> bool {
        self.state.get(key)
    }

    pub fn state(&self) -> ModifierState {
        self.state
    }

    pub fn on_key_down(&mut self, event: &KeyEvent) {
        self.update(event, true);
    }

    pub fn on_key_up(&mut self, event: &KeyEvent) {
        self.update(event, false);
    }

    fn update(&mut self, event: &KeyEvent, held: bool) {
        if let Ok(key) = event.key.parse::<ModifierKey>() {
            trace!(%key, held, "modifier updated");
            self.state.set(key, held);
        }
    }
}

/// Install the tracker as document-wide key listeners
pub fn listen(document: &mut Document, keys: Rc<RefCell<ModifierKeys>>) -> [ListenerId; 2] {
    let down = {
        let keys = Rc::clone(&keys);
        document.add_event_listener(Target::Document, EventKind::KeyDown, move |event, _| {
            if let Some(key) = event.as_key() {
                keys.borrow_mut().on_key_down(key);
            }
        })
    };
    let up = document.add_event_listener(Target::Document, EventKind::KeyUp, move |event, _| {
        if let Some(key) = event.as_key() {
            keys.borrow_mut().on_key_up(key);
        }
    });
    [down, up]
}
