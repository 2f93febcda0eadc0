//! Single-threaded input event loop
//!
//! Owns the document and its trackers, applies input events one at a
//! time, and opens a press/release session for every press.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::document::{Document, KeyEvent, Target};
use crate::events::{InputEvent, SessionEvent};
use crate::input::{
    modifier, mouse, pair_key_events, pair_pointer_events, ModifierKeys, ModifierState, MouseButton,
    MouseTracker,
};

/// Work items accepted by the event loop
#[derive(Debug)]
pub enum Command {
    /// Apply an input event
    Dispatch(InputEvent),
    /// Ask whether a modifier key is held
    IsPressed {
        key: String,
        reply: oneshot::Sender<bool>,
    },
    /// Ask for the current tracker state
    Snapshot { reply: oneshot::Sender<InputSnapshot> },
}

/// Point-in-time view of the trackers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub modifiers: ModifierState,
    pub button: MouseButton,
    pub position: Option<(f64, f64)>,
}

/// The event loop that owns all input state
pub struct EventLoop {
    document: Document,
    modifiers: Rc<RefCell<ModifierKeys>>,
    mouse: Rc<RefCell<MouseTracker>>,
    /// Class applied to pressed elements
    active_class: Option<String>,
    /// Channel for emitting session events
    event_tx: broadcast::Sender<SessionEvent>,
}

impl EventLoop {
    /// Create an event loop with trackers installed on a fresh document
    pub fn new(event_tx: broadcast::Sender<SessionEvent>, active_class: Option<String>) -> Self {
        let mut document = Document::new();
        let modifiers = Rc::new(RefCell::new(ModifierKeys::new()));
        let mouse = Rc::new(RefCell::new(MouseTracker::new()));
        modifier::listen(&mut document, Rc::clone(&modifiers));
        mouse::listen(&mut document, Rc::clone(&mouse));

        Self {
            document,
            modifiers,
            mouse,
            active_class,
            event_tx,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.modifiers.borrow().is(key)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        let mouse = self.mouse.borrow();
        InputSnapshot {
            modifiers: self.modifiers.borrow().state(),
            button: mouse.button(),
            position: mouse.position(),
        }
    }

    /// Process commands until every sender is dropped
    pub async fn run(&mut self, mut command_rx: mpsc::Receiver<Command>) {
        info!("event loop started");

        while let Some(command) = command_rx.recv().await {
            self.handle(command);
        }

        info!("event loop stopped");
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Dispatch(event) => self.handle_input(event),
            Command::IsPressed { key, reply } => {
                let _ = reply.send(self.is_pressed(&key));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Apply one input event
    pub fn handle_input(&mut self, input: InputEvent) {
        // Only a press creates elements; anything else aimed at an unknown
        // name reaches the document listeners directly
        let target = match (&input, input.target()) {
            (InputEvent::PointerDown { .. }, Some(name)) => {
                Target::Element(self.document.element_or_insert(name))
            }
            (_, Some(name)) => self
                .document
                .element_named(name)
                .map(Target::Element)
                .unwrap_or(Target::Document),
            (_, None) => Target::Document,
        };
        let event = input.to_event();
        debug!(?target, kind = ?event.kind(), "input");

        self.document.dispatch(target, &event);

        match &input {
            InputEvent::KeyDown { repeat: false, .. } => {
                if let Some(key) = event.as_key() {
                    self.open_key_session(key);
                }
            }
            InputEvent::PointerDown { .. } => self.open_pointer_session(target),
            InputEvent::PointerUp { .. } => {
                self.document.prune_idle_elements();
            }
            _ => {}
        }
    }

    fn open_pointer_session(&mut self, target: Target) {
        let name = self.document.target_name(target);
        let pressed_at = Instant::now();

        let press_tx = self.event_tx.clone();
        let press_name = name.clone();
        let release_tx = self.event_tx.clone();

        pair_pointer_events(
            &mut self.document,
            target,
            move |_| emit(&press_tx, SessionEvent::PointerPressed { target: press_name }),
            move |_| {
                emit(
                    &release_tx,
                    SessionEvent::PointerReleased {
                        target: name,
                        duration_ms: pressed_at.elapsed().as_millis() as u64,
                    },
                )
            },
            self.active_class.as_deref(),
        );
    }

    fn open_key_session(&mut self, original: &KeyEvent) {
        let pressed_at = Instant::now();
        let pressed = original.key.clone();

        let press_tx = self.event_tx.clone();
        let release_tx = self.event_tx.clone();

        pair_key_events(
            &mut self.document,
            original,
            move |e| emit(&press_tx, SessionEvent::KeyPressed { key: e.key.clone() }),
            move |e| {
                emit(
                    &release_tx,
                    SessionEvent::KeyReleased {
                        pressed,
                        released: e.key.clone(),
                        duration_ms: pressed_at.elapsed().as_millis() as u64,
                    },
                )
            },
        );
    }
}

fn emit(tx: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    debug!(%event, "emitting session event");
    // No receivers is fine
    let _ = tx.send(event);
}
