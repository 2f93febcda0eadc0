//! Host module: the event loop that owns all input state
//!
//! Commands arrive over an mpsc channel and run to completion one at a
//! time, so no locking is needed around the document or trackers.

mod event_loop;

pub use event_loop::{Command, EventLoop, InputSnapshot};
