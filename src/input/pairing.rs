//! Press/release pairing
//!
//! A press callback runs immediately; the matching release callback runs
//! exactly once on the first release delivered afterwards, even when the
//! pointer is let go outside the pressed element.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::document::{Document, Event, EventKind, KeyEvent, ListenerId, Target};
use crate::session::ReleaseGate;

/// Class applied to a pressed element when the caller has no preference
pub const DEFAULT_ACTIVE_CLASS: &str = "swap-active";

/// Pair a pointer press on `target` with its release.
///
/// `on_press` runs before this returns. Release listeners go on the target
/// and on the document; whichever sees the first pointer-up runs
/// `on_release`, drops `active_class` and removes both listeners.
pub fn pair_pointer_events<P, R>(
    document: &mut Document,
    target: Target,
    on_press: P,
    on_release: R,
    active_class: Option<&str>,
) where
    P: FnOnce(Target),
    R: FnOnce(Target) + 'static,
{
    on_press(target);

    let class = active_class
        .filter(|_| target.is_styleable())
        .map(str::to_owned);
    if let Some(class) = &class {
        document.add_class(target, class);
    }

    let gate = Rc::new(RefCell::new(ReleaseGate::armed(on_release)));
    let registered: Rc<RefCell<Vec<ListenerId>>> = Rc::new(RefCell::new(Vec::with_capacity(2)));

    let release = {
        let registered = Rc::clone(&registered);
        move |_: &Event, document: &mut Document| {
            let fired = gate.borrow_mut().fire();
            let Some(on_release) = fired else {
                return;
            };

            on_release(target);
            if let Some(class) = &class {
                document.remove_class(target, class);
            }
            for id in registered.borrow_mut().drain(..) {
                document.remove_event_listener(id);
            }
            debug!(?target, "pointer session released");
        }
    };

    let mut ids = vec![document.add_event_listener(target, EventKind::PointerUp, release.clone())];
    if target != Target::Document {
        ids.push(document.add_event_listener(Target::Document, EventKind::PointerUp, release));
    }
    registered.borrow_mut().extend(ids);
}

/// Pair a key press with the next key release.
///
/// The release is not matched against the pressed key: whatever key-up
/// arrives next on the document completes the session.
pub fn pair_key_events<P, R>(document: &mut Document, original: &KeyEvent, on_press: P, on_release: R)
where
    P: FnOnce(&KeyEvent),
    R: FnOnce(&KeyEvent) + 'static,
{
    on_press(original);

    let mut gate = ReleaseGate::armed(on_release);
    let registered: Rc<RefCell<Option<ListenerId>>> = Rc::new(RefCell::new(None));

    let id = {
        let registered = Rc::clone(&registered);
        document.add_event_listener(Target::Document, EventKind::KeyUp, move |event, document| {
            let Some(key) = event.as_key() else {
                return;
            };
            let Some(on_release) = gate.fire() else {
                return;
            };

            on_release(key);
            if let Some(id) = registered.borrow_mut().take() {
                document.remove_event_listener(id);
            }
            debug!(key = %key.key, "key session released");
        })
    };
    *registered.borrow_mut() = Some(id);
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::document::PointerEvent;

    fn pointer_up() -> Event {
        Event::PointerUp(PointerEvent::new(0, 0.0, 0.0))
    }

    fn counter() -> (Rc<Cell<i32>>, Rc<Cell<i32>>) {
        let c = Rc::new(Cell::new(0));
        (Rc::clone(&c), c)
    }

    #[test]
    fn test_press_then_release_on_document() {
        let mut doc = Document::new();
        let button = Target::Element(doc.create_element("button"));
        let (count, inc) = counter();
        let dec = Rc::clone(&count);

        pair_pointer_events(
            &mut doc,
            button,
            move |_| inc.set(inc.get() + 1),
            move |_| dec.set(dec.get() - 1),
            Some("active"),
        );
        assert_eq!(count.get(), 1);
        assert!(doc.has_class(button, "active"));

        doc.dispatch(Target::Document, &pointer_up());
        assert_eq!(count.get(), 0);
        assert!(!doc.has_class(button, "active"));
    }

    #[test]
    fn test_release_on_target_fires_once() {
        let mut doc = Document::new();
        let button = Target::Element(doc.create_element("button"));
        let (releases, r) = counter();

        pair_pointer_events(&mut doc, button, |_| (), move |_| r.set(r.get() + 1), Some("active"));

        // Bubbles from the button to the document; only the first delivery counts
        doc.dispatch(button, &pointer_up());
        assert_eq!(releases.get(), 1);
        assert!(!doc.has_class(button, "active"));

        doc.dispatch(button, &pointer_up());
        doc.dispatch(Target::Document, &pointer_up());
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_release_elsewhere_fires_once() {
        let mut doc = Document::new();
        let button = Target::Element(doc.create_element("button"));
        let other = Target::Element(doc.create_element("map"));
        let (releases, r) = counter();

        pair_pointer_events(&mut doc, button, |_| (), move |_| r.set(r.get() + 1), None);

        doc.dispatch(other, &pointer_up());
        doc.dispatch(other, &pointer_up());
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_listeners_removed_after_release() {
        let mut doc = Document::new();
        let button = Target::Element(doc.create_element("button"));

        pair_pointer_events(&mut doc, button, |_| (), |_| (), None);
        assert_eq!(doc.listener_count(button, EventKind::PointerUp), 1);
        assert_eq!(doc.listener_count(Target::Document, EventKind::PointerUp), 1);

        doc.dispatch(Target::Document, &pointer_up());
        assert_eq!(doc.listener_count(button, EventKind::PointerUp), 0);
        assert_eq!(doc.listener_count(Target::Document, EventKind::PointerUp), 0);
    }

    #[test]
    fn test_callbacks_receive_target() {
        let mut doc = Document::new();
        let button = Target::Element(doc.create_element("button"));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let on_press = Rc::clone(&seen);
        let on_release = Rc::clone(&seen);
        pair_pointer_events(
            &mut doc,
            button,
            move |t| on_press.borrow_mut().push(t),
            move |t| on_release.borrow_mut().push(t),
            None,
        );
        doc.dispatch(Target::Document, &pointer_up());

        assert_eq!(*seen.borrow(), vec![button, button]);
    }

    #[test]
    fn test_document_target_is_not_styled() {
        let mut doc = Document::new();
        let (releases, r) = counter();

        pair_pointer_events(
            &mut doc,
            Target::Document,
            |_| (),
            move |_| r.set(r.get() + 1),
            Some("active"),
        );
        assert_eq!(doc.listener_count(Target::Document, EventKind::PointerUp), 1);

        doc.dispatch(Target::Document, &pointer_up());
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_concurrent_sessions_are_independent() {
        let mut doc = Document::new();
        let a = Target::Element(doc.create_element("a"));
        let b = Target::Element(doc.create_element("b"));
        let (releases, r1) = counter();
        let r2 = Rc::clone(&releases);

        pair_pointer_events(&mut doc, a, |_| (), move |_| r1.set(r1.get() + 1), Some("active"));
        pair_pointer_events(&mut doc, b, |_| (), move |_| r2.set(r2.get() + 10), Some("active"));

        doc.dispatch(Target::Document, &pointer_up());
        assert_eq!(releases.get(), 11);
        assert!(!doc.has_class(a, "active"));
        assert!(!doc.has_class(b, "active"));
    }

    #[test]
    fn test_key_pair_fires_on_next_key_up() {
        let mut doc = Document::new();
        let pressed = Rc::new(RefCell::new(None));
        let released = Rc::new(RefCell::new(Vec::new()));

        let p = Rc::clone(&pressed);
        let r = Rc::clone(&released);
        pair_key_events(
            &mut doc,
            &KeyEvent::new("a"),
            move |e| *p.borrow_mut() = Some(e.key.clone()),
            move |e| r.borrow_mut().push(e.key.clone()),
        );
        assert_eq!(pressed.borrow().as_deref(), Some("a"));
        assert!(released.borrow().is_empty());

        doc.dispatch(Target::Document, &Event::KeyUp(KeyEvent::new("a")));
        doc.dispatch(Target::Document, &Event::KeyUp(KeyEvent::new("a")));
        assert_eq!(*released.borrow(), vec!["a".to_owned()]);
        assert_eq!(doc.listener_count(Target::Document, EventKind::KeyUp), 0);
    }

    #[test]
    fn test_key_pair_does_not_match_keys() {
        let mut doc = Document::new();
        let released = Rc::new(RefCell::new(None));

        let r = Rc::clone(&released);
        pair_key_events(
            &mut doc,
            &KeyEvent::new("a"),
            |_| (),
            move |e| *r.borrow_mut() = Some(e.key.clone()),
        );

        doc.dispatch(Target::Document, &Event::KeyUp(KeyEvent::new("b")));
        assert_eq!(released.borrow().as_deref(), Some("b"));
    }

    #[test]
    fn test_key_pair_ignores_key_down() {
        let mut doc = Document::new();
        let (releases, r) = counter();

        pair_key_events(&mut doc, &KeyEvent::new("a"), |_| (), move |_| r.set(r.get() + 1));
        doc.dispatch(Target::Document, &Event::KeyDown(KeyEvent::new("a")));
        assert_eq!(releases.get(), 0);
    }
}
