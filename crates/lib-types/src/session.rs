//! Engine session state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an engine session.
///
/// The only transitions are `Uninitialized -> Ready` (successful init) and
/// `Ready -> Terminated` (shutdown). `Terminated` is absorbing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Session created but the native `init` has not succeeded yet.
    Uninitialized,
    /// Native `init` completed; hints may be requested.
    Ready,
    /// Native `shutdown` has been called.
    Terminated,
}

impl SessionState {
    /// Whether hint requests are accepted in this state.
    pub fn accepts_hints(self) -> bool {
        self == Self::Ready
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
