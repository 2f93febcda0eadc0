//! Event targets: the document itself and the named elements inside it.

use std::fmt;

/// Opaque handle to an element owned by a [`Document`](super::Document)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub(super) u32);

/// Anything that accepts event listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The document-level stream every element event bubbles to
    Document,
    /// A single element
    Element(ElementId),
}

impl Target {
    /// Only elements carry a class list
    pub fn is_styleable(&self) -> bool {
        matches!(self, Target::Element(_))
    }
}

/// Ordered set of CSS-like class names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    /// Add a class. Returns false if it was already present.
    pub fn add(&mut self, class: &str) -> bool {
        if self.contains(class) {
            return false;
        }
        self.0.push(class.to_owned());
        true
    }

    /// Remove a class. Returns false if it was not present.
    pub fn remove(&mut self, class: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != class);
        self.0.len() != before
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// A named, styleable element
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    classes: ClassList,
}

impl Element {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            classes: ClassList::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassList {
        &mut self.classes
    }
}
