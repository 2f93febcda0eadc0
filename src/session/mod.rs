//! Press/release session state
//!
//! Provides an explicit two-state machine for press/release pairing:
//! - Armed: pressed, release pending
//! - Fired: release delivered exactly once

mod gate;

pub use gate::{ReleaseGate, SessionState};
