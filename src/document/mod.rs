//! Single-threaded document model
//!
//! Elements, class lists, and listener registration with bubbling
//! dispatch from an element to the document.

mod dispatch;
mod event;
mod target;

pub use dispatch::{Document, ListenerId};
pub use event::{Event, EventKind, KeyEvent, PointerEvent};
pub use target::{ClassList, Element, ElementId, Target};
