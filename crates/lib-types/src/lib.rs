//! # lib-types
//!
//! Core type definitions for the native backgammon hint engine.
//!
//! This crate provides the values exchanged with the engine adapter:
//! - Session lifecycle state
//! - Hint requests and results
//! - A typed view over the engine's hint document

pub mod session;
pub mod hint;
pub mod recommendation;

pub use session::*;
pub use hint::*;
pub use recommendation::*;

/// Re-export serde_json's value type, the payload of a decoded hint.
pub use serde_json::Value;
