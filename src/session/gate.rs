//! One-shot release gate
//!
//! Two states, one legal transition: `Armed -> Fired`. The release
//! callback lives inside the armed state, so it can be handed out at
//! most once no matter how many release deliveries race for it.

use std::fmt;

/// Observable state of a press/release session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Pressed, waiting for the first release
    Armed,
    /// Release delivered; further releases are ignored
    Fired,
}

/// Holds a release callback until the first release fires it
pub enum ReleaseGate<F> {
    Armed(F),
    Fired,
}

impl<F> ReleaseGate<F> {
    pub fn armed(on_release: F) -> Self {
        ReleaseGate::Armed(on_release)
    }

    pub fn state(&self) -> SessionState {
        match self {
            ReleaseGate::Armed(_) => SessionState::Armed,
            ReleaseGate::Fired => SessionState::Fired,
        }
    }

    /// Take the release callback, moving to `Fired`.
    ///
    /// Returns `None` on every call after the first.
    pub fn fire(&mut self) -> Option<F> {
        match std::mem::replace(self, ReleaseGate::Fired) {
            ReleaseGate::Armed(f) => Some(f),
            ReleaseGate::Fired => None,
        }
    }
}

impl<F> fmt::Debug for ReleaseGate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReleaseGate").field(&self.state()).finish()
    }
}
