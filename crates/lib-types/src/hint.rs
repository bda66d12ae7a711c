//! Hint request and result types.
//!
//! The engine answers a hint request with a JSON document whose schema this
//! layer does not own. A result is therefore either the decoded document or
//! an explicit "no result" marker.

use crate::recommendation::Recommendation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One request for the engine's recommendation on a position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintRequest {
    /// Opaque position identifier, passed to the engine unmodified.
    pub position_id: String,

    /// Search depth in plies.
    pub depth: u32,
}

impl HintRequest {
    /// Create a request. The position identifier is stored as given.
    pub fn new(position_id: impl Into<String>, depth: u32) -> Self {
        Self {
            position_id: position_id.into(),
            depth,
        }
    }
}

/// Outcome of a hint evaluation.
///
/// Analysis failures inside the engine and undecodable responses both map
/// to [`HintResult::NoResult`]; callers cannot tell them apart.
#[derive(Clone, Debug, PartialEq)]
pub enum HintResult {
    /// The engine's response, decoded as JSON.
    Decoded(Value),
    /// The engine produced nothing usable.
    NoResult,
}

impl HintResult {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }

    pub fn is_no_result(&self) -> bool {
        matches!(self, Self::NoResult)
    }

    /// Borrow the decoded document, if any.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Decoded(value) => Some(value),
            Self::NoResult => None,
        }
    }

    /// Interpret the document with the known engine schema.
    ///
    /// Returns `None` for [`HintResult::NoResult`] and for documents of any
    /// other shape.
    pub fn recommendation(&self) -> Option<Recommendation> {
        self.as_value().and_then(Recommendation::from_value)
    }
}
