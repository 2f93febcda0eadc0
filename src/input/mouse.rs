//! Pointer button and position tracking

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::document::{Document, EventKind, ListenerId, PointerEvent, Target};

/// The button currently held, by DOM button code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Unknown,
    Left,
    Middle,
    Right,
}

impl From<i16> for MouseButton {
    fn from(code: i16) -> Self {
        match code {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Unknown,
        }
    }
}

/// Last pressed button and last known pointer position
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseTracker {
    button: MouseButton,
    position: Option<(f64, f64)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button(&self) -> MouseButton {
        self.button
    }

    pub fn is(&self, button: MouseButton) -> bool {
        self.button == button
    }

    /// `None` until the first pointer move
    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.button = MouseButton::from(event.button);
    }

    /// Any release clears the button, whichever one was let go
    pub fn on_pointer_up(&mut self, _event: &PointerEvent) {
        self.button = MouseButton::Unknown;
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) {
        self.position = Some(event.position);
    }
}

/// Install the tracker as document-wide pointer listeners
pub fn listen(document: &mut Document, mouse: Rc<RefCell<MouseTracker>>) -> [ListenerId; 3] {
    let down = {
        let mouse = Rc::clone(&mouse);
        document.add_event_listener(Target::Document, EventKind::PointerDown, move |event, _| {
            if let Some(pointer) = event.as_pointer() {
                mouse.borrow_mut().on_pointer_down(pointer);
            }
        })
    };
    let up = {
        let mouse = Rc::clone(&mouse);
        document.add_event_listener(Target::Document, EventKind::PointerUp, move |event, _| {
            if let Some(pointer) = event.as_pointer() {
                mouse.borrow_mut().on_pointer_up(pointer);
            }
        })
    };
    let moved = document.add_event_listener(Target::Document, EventKind::PointerMove, move |event, _| {
        if let Some(pointer) = event.as_pointer() {
            mouse.borrow_mut().on_pointer_move(pointer);
        }
    });
    [down, up, moved]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Event;

    #[test]
    fn test_button_codes() {
        assert_eq!(MouseButton::from(0), MouseButton::Left);
        assert_eq!(MouseButton::from(1), MouseButton::Middle);
        assert_eq!(MouseButton::from(2), MouseButton::Right);
        assert_eq!(MouseButton::from(3), MouseButton::Unknown);
        assert_eq!(MouseButton::from(-1), MouseButton::Unknown);
    }

    #[test]
    fn test_press_and_release() {
        let mut mouse = MouseTracker::new();
        assert!(mouse.is(MouseButton::Unknown));

        mouse.on_pointer_down(&PointerEvent::new(2, 0.0, 0.0));
        assert!(mouse.is(MouseButton::Right));

        mouse.on_pointer_up(&PointerEvent::new(0, 0.0, 0.0));
        assert!(mouse.is(MouseButton::Unknown));
    }

    #[test]
    fn test_position_unknown_until_move() {
        let mut mouse = MouseTracker::new();
        assert_eq!(mouse.position(), None);
        mouse.on_pointer_move(&PointerEvent::new(0, 12.5, 40.0));
        assert_eq!(mouse.position(), Some((12.5, 40.0)));
    }

    #[test]
    fn test_listen_sees_bubbled_element_events() {
        let mut doc = Document::new();
        let canvas = Target::Element(doc.create_element("canvas"));
        let mouse = Rc::new(RefCell::new(MouseTracker::new()));
        listen(&mut doc, Rc::clone(&mouse));

        doc.dispatch(canvas, &Event::PointerDown(PointerEvent::new(1, 5.0, 5.0)));
        assert_eq!(mouse.borrow().button(), MouseButton::Middle);

        doc.dispatch(Target::Document, &Event::PointerMove(PointerEvent::new(0, 8.0, 9.0)));
        assert_eq!(mouse.borrow().position(), Some((8.0, 9.0)));

        doc.dispatch(Target::Document, &Event::PointerUp(PointerEvent::new(1, 8.0, 9.0)));
        assert_eq!(mouse.borrow().button(), MouseButton::Unknown);
    }
}
