//! Listener registry and event dispatch
//!
//! Dispatch is single-threaded and run-to-completion. Callbacks receive
//! the document mutably so they can change classes and deregister
//! listeners (their own included) while an event is in flight.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use super::event::{Event, EventKind};
use super::target::{Element, ElementId, Target};

/// Handle returned by [`Document::add_event_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Rc<RefCell<dyn FnMut(&Event, &mut Document)>>;

struct Listener {
    id: ListenerId,
    target: Target,
    kind: EventKind,
    callback: Callback,
}

/// A minimal document: named elements plus listeners on them and on
/// the document itself
#[derive(Default)]
pub struct Document {
    elements: HashMap<ElementId, Element>,
    names: HashMap<String, ElementId>,
    listeners: Vec<Listener>,
    next_element: u32,
    next_listener: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new element. Names are unique; an existing name returns
    /// the element already registered under it.
    pub fn create_element(&mut self, name: &str) -> ElementId {
        if let Some(id) = self.names.get(name) {
            return *id;
        }
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(id, Element::new(name));
        self.names.insert(name.to_owned(), id);
        trace!(name, ?id, "element created");
        id
    }

    pub fn element_named(&self, name: &str) -> Option<ElementId> {
        self.names.get(name).copied()
    }

    /// Look up an element by name, creating it on first sight
    pub fn element_or_insert(&mut self, name: &str) -> ElementId {
        self.create_element(name)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Drop elements with no listeners and no classes. Returns how many
    /// were removed.
    pub fn prune_idle_elements(&mut self) -> usize {
        let idle: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|(id, element)| {
                element.classes().is_empty()
                    && !self.listeners.iter().any(|l| l.target == Target::Element(**id))
            })
            .map(|(id, _)| *id)
            .collect();

        for id in &idle {
            if let Some(element) = self.elements.remove(id) {
                self.names.remove(element.name());
            }
        }
        if !idle.is_empty() {
            trace!(count = idle.len(), "pruned idle elements");
        }
        idle.len()
    }

    /// Human-readable name of a target
    pub fn target_name(&self, target: Target) -> String {
        match target {
            Target::Document => "document".to_owned(),
            Target::Element(id) => self
                .elements
                .get(&id)
                .map(|e| e.name().to_owned())
                .unwrap_or_else(|| format!("element#{}", id.0)),
        }
    }

    /// Register a listener for `kind` events reaching `target`
    pub fn add_event_listener<F>(&mut self, target: Target, kind: EventKind, callback: F) -> ListenerId
    where
        F: FnMut(&Event, &mut Document) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener {
            id,
            target,
            kind,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    /// Deregister a listener. Returns false if it was already gone.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    pub fn listener_count(&self, target: Target, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }

    /// Add a class to a styleable target. Returns false for the document
    /// or an unknown element.
    pub fn add_class(&mut self, target: Target, class: &str) -> bool {
        match target {
            Target::Element(id) => self
                .elements
                .get_mut(&id)
                .map(|e| e.classes_mut().add(class))
                .unwrap_or(false),
            Target::Document => false,
        }
    }

    pub fn remove_class(&mut self, target: Target, class: &str) -> bool {
        match target {
            Target::Element(id) => self
                .elements
                .get_mut(&id)
                .map(|e| e.classes_mut().remove(class))
                .unwrap_or(false),
            Target::Document => false,
        }
    }

    pub fn has_class(&self, target: Target, class: &str) -> bool {
        match target {
            Target::Element(id) => self
                .elements
                .get(&id)
                .map(|e| e.classes().contains(class))
                .unwrap_or(false),
            Target::Document => false,
        }
    }

    /// Deliver an event at `target`, then bubble it to the document
    pub fn dispatch(&mut self, target: Target, event: &Event) {
        let kind = event.kind();
        trace!(?target, ?kind, "dispatch");

        let path = match target {
            Target::Element(_) => vec![target, Target::Document],
            Target::Document => vec![Target::Document],
        };

        for hop in path {
            let snapshot: Vec<(ListenerId, Callback)> = self
                .listeners
                .iter()
                .filter(|l| l.target == hop && l.kind == kind)
                .map(|l| (l.id, Rc::clone(&l.callback)))
                .collect();

            for (id, callback) in snapshot {
                // Removed by an earlier listener in this dispatch
                if !self.is_registered(id) {
                    continue;
                }
                // Already running further up the stack
                let Ok(mut callback) = callback.try_borrow_mut() else {
                    trace!(?id, "skipping re-entrant listener");
                    continue;
                };
                (&mut *callback)(event, self);
            }
        }
    }
}
