//! Input trackers and press/release pairing
//!
//! Trackers are plain structs installed on a [`Document`](crate::document::Document)
//! through their `listen` functions, so independent instances can coexist.

pub mod modifier;
pub mod mouse;
mod pairing;

pub use modifier::{ModifierKey, ModifierKeys, ModifierState, UnknownKey};
pub use mouse::{MouseButton, MouseTracker};
pub use pairing::{pair_key_events, pair_pointer_events, DEFAULT_ACTIVE_CLASS};
