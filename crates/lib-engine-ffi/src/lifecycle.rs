//! Engine session lifecycle management.
//!
//! This module manages the lifecycle of the native engine, including:
//! - Initialization (`init`)
//! - Hint evaluation (`hint` + buffer release)
//! - Teardown (`shutdown`)
//!
//! The engine keeps its state in process-wide globals, so at most one ready
//! session may exist per native module in a process. Every loaded
//! [`EngineLibrary`] reports the same module id, whatever path it was
//! opened through.

use crate::engine::NativeEngine;
use crate::error::{EngineError, EngineResult};
use crate::hint::{marshal_depth, marshal_position, request_hint};
use crate::loader::EngineLibrary;
use crate::sync::RecoverMutex;
use lib_types::{HintRequest, HintResult};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

pub use lib_types::SessionState;

/// Modules that currently have a ready session.
static ACTIVE_MODULES: Mutex<BTreeSet<String>> = Mutex::new(BTreeSet::new());

fn claim_module(module: &str) -> bool {
    ACTIVE_MODULES.lock_recover().insert(module.to_string())
}

fn release_module(module: &str) {
    ACTIVE_MODULES.lock_recover().remove(module);
}

/// Whether some session currently holds the given module.
pub fn is_module_active(module: &str) -> bool {
    ACTIVE_MODULES.lock_recover().contains(module)
}

/// A session on the native engine.
///
/// State moves `Uninitialized -> Ready -> Terminated` and never back.
/// Hints are only requested while `Ready`; outside that state every
/// operation fails without touching the engine.
///
/// # Thread Safety
///
/// The engine is not reentrant. All operations take `&mut self`, and the
/// session is `!Sync`, so a shared reference cannot be used to call into
/// the engine from two threads. To share a session, use
/// [`SharedEngineSession`](crate::SharedEngineSession), which serializes
/// every call behind one lock.
pub struct EngineSession<E: NativeEngine + ?Sized = EngineLibrary> {
    /// The engine entry points.
    engine: Arc<E>,

    /// Current session state.
    state: SessionState,

    /// Number of hint calls made.
    hint_count: u64,

    /// Marker to prevent a `Sync` implementation.
    _not_sync: std::marker::PhantomData<std::cell::Cell<()>>,
}

impl<E: NativeEngine + ?Sized> EngineSession<E> {
    /// Create a new uninitialized session.
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            state: SessionState::Uninitialized,
            hint_count: 0,
            _not_sync: std::marker::PhantomData,
        }
    }

    /// Get the current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.accepts_hints()
    }

    /// Identifier of the engine module this session drives.
    pub fn module_id(&self) -> &str {
        self.engine.module_id()
    }

    /// Number of hints requested so far.
    pub fn hint_count(&self) -> u64 {
        self.hint_count
    }

    /// Initialize the engine.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AlreadyInitialized`] if the session is ready.
    /// - [`EngineError::NotReady`] if the session was torn down.
    /// - [`EngineError::SessionActive`] if another session holds the module.
    /// - [`EngineError::InitFailed`] if the engine reports a nonzero status.
    ///   The session stays uninitialized.
    pub fn initialize(&mut self) -> EngineResult<()> {
        match self.state {
            SessionState::Uninitialized => {}
            SessionState::Ready => return Err(EngineError::AlreadyInitialized),
            SessionState::Terminated => return Err(EngineError::not_ready(self.state)),
        }

        let module = self.engine.module_id().to_string();
        if !claim_module(&module) {
            return Err(EngineError::SessionActive { module });
        }

        let code = self.engine.init();
        if code != 0 {
            release_module(&module);
            tracing::error!(module = %module, code, "Engine init failed");
            return Err(EngineError::InitFailed { code });
        }

        self.state = SessionState::Ready;
        tracing::info!(module = %module, "Engine session ready");
        Ok(())
    }

    /// Evaluate a position at the given depth.
    ///
    /// The position identifier and depth are passed to the engine unchanged.
    /// A missing or undecodable response is reported as
    /// [`HintResult::NoResult`], not as an error.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotReady`] outside the ready state; the engine is not
    ///   called.
    /// - [`EngineError::InvalidParameter`] if the identifier contains a NUL
    ///   byte or the depth does not fit the engine's integer type.
    pub fn evaluate(&mut self, position_id: &str, depth: u32) -> EngineResult<HintResult> {
        if !self.state.accepts_hints() {
            return Err(EngineError::not_ready(self.state));
        }

        let position = marshal_position(position_id)?;
        let depth = marshal_depth(depth)?;

        let result = request_hint(&*self.engine, &position, depth);
        self.hint_count += 1;
        Ok(result)
    }

    /// Evaluate a [`HintRequest`].
    pub fn evaluate_request(&mut self, request: &HintRequest) -> EngineResult<HintResult> {
        self.evaluate(&request.position_id, request.depth)
    }

    /// Shut the engine down.
    ///
    /// The session is terminated even if the engine reports a nonzero
    /// shutdown status; that status is returned as
    /// [`EngineError::ShutdownFailed`].
    ///
    /// # Errors
    ///
    /// [`EngineError::NotReady`] unless the session is ready.
    pub fn teardown(&mut self) -> EngineResult<()> {
        if !self.is_ready() {
            return Err(EngineError::not_ready(self.state));
        }

        let code = self.engine.shutdown();

        // Update state regardless of result
        self.state = SessionState::Terminated;
        release_module(self.engine.module_id());

        if code != 0 {
            return Err(EngineError::ShutdownFailed { code });
        }

        tracing::info!(
            module = %self.engine.module_id(),
            hint_count = self.hint_count,
            "Engine session terminated"
        );
        Ok(())
    }
}

impl<E: NativeEngine + ?Sized> Drop for EngineSession<E> {
    fn drop(&mut self) {
        if self.is_ready() {
            // Best-effort teardown, log but don't propagate errors
            if let Err(e) = self.teardown() {
                tracing::warn!(error = %e, "Error during session cleanup");
            }
        }
    }
}
