//! Error types for engine FFI operations.

use lib_types::SessionState;
use std::ffi::c_int;
use thiserror::Error;

/// Errors surfaced by the engine adapter.
///
/// Only structural failures appear here. A bad response from the engine is
/// not an error; it becomes [`lib_types::HintResult::NoResult`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to load the shared library.
    #[error("Failed to load library '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: libloading::Error,
    },

    /// Required symbol not found in library.
    #[error("Symbol '{symbol}' not found in library")]
    SymbolNotFound { symbol: String },

    /// Native `init` reported failure.
    #[error("Engine initialization failed with code {code}")]
    InitFailed { code: c_int },

    /// Native `shutdown` reported failure.
    #[error("Engine shutdown failed with code {code}")]
    ShutdownFailed { code: c_int },

    /// `initialize` called on a session that is already ready.
    #[error("Engine session is already initialized")]
    AlreadyInitialized,

    /// Operation requires a ready session.
    #[error("Engine session is not ready (state: {state})")]
    NotReady { state: SessionState },

    /// Another session already holds the native module.
    #[error("Engine module '{module}' already has an active session")]
    SessionActive { module: String },

    /// Argument cannot be passed across the boundary.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl EngineError {
    /// Create a load error.
    pub fn load_error(path: impl Into<String>, source: libloading::Error) -> Self {
        Self::LoadError {
            path: path.into(),
            source,
        }
    }

    /// Create a symbol not found error.
    pub fn symbol_not_found(symbol: impl Into<String>) -> Self {
        Self::SymbolNotFound {
            symbol: symbol.into(),
        }
    }

    pub fn not_ready(state: SessionState) -> Self {
        Self::NotReady { state }
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Caller-side precondition violations; the session is left untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotReady { .. }
                | Self::AlreadyInitialized
                | Self::SessionActive { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Failures that end the current attempt to bring an engine up.
    ///
    /// Nothing is ready afterwards. A session that saw
    /// [`EngineError::InitFailed`] stays uninitialized, so the caller may
    /// still retry `initialize` on it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::LoadError { .. } | Self::SymbolNotFound { .. } | Self::InitFailed { .. }
        )
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Why a native response could not be decoded. Never leaves the crate.
#[derive(Debug, Error)]
pub(crate) enum DecodeError {
    #[error("response is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
