//! A session that can be shared between threads.

use crate::engine::NativeEngine;
use crate::error::EngineResult;
use crate::lifecycle::EngineSession;
use crate::loader::EngineLibrary;
use crate::sync::RecoverMutex;
use lib_types::{HintResult, SessionState};
use std::sync::{Arc, Mutex};

/// Cloneable handle to one [`EngineSession`] behind a single lock.
///
/// State transitions and hint calls all take the same lock, so
/// `initialize`, `evaluate`, and `teardown` never overlap and the engine
/// only ever sees one call at a time. A caller blocked on the lock waits
/// for the full duration of the call in flight.
pub struct SharedEngineSession<E: NativeEngine + ?Sized = EngineLibrary> {
    inner: Arc<Mutex<EngineSession<E>>>,
}

impl<E: NativeEngine + ?Sized> Clone for SharedEngineSession<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: NativeEngine + ?Sized> SharedEngineSession<E> {
    pub fn new(session: EngineSession<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Shorthand for wrapping a fresh session on `engine`.
    pub fn from_engine(engine: Arc<E>) -> Self {
        Self::new(EngineSession::new(engine))
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock_recover().state()
    }

    /// See [`EngineSession::initialize`].
    pub fn initialize(&self) -> EngineResult<()> {
        self.inner.lock_recover().initialize()
    }

    /// See [`EngineSession::evaluate`].
    pub fn evaluate(&self, position_id: &str, depth: u32) -> EngineResult<HintResult> {
        self.inner.lock_recover().evaluate(position_id, depth)
    }

    /// See [`EngineSession::teardown`].
    pub fn teardown(&self) -> EngineResult<()> {
        self.inner.lock_recover().teardown()
    }
}
