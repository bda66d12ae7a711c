//! In-process stand-in for the native engine, used by unit tests.
//!
//! Buffers handed out by `hint` are owned by the fake. `free` poisons a
//! buffer and moves it to a graveyard instead of deallocating it, so a read
//! after release yields garbage bytes rather than undefined behavior.

use crate::engine::NativeEngine;
use std::collections::HashMap;
use std::ffi::{c_char, c_int, CStr};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

type Responder = Box<dyn Fn(&str, c_int) -> Option<Vec<u8>> + Send + Sync>;

/// One recorded entry-point call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Init,
    Shutdown,
    Hint { position_id: String, depth: c_int },
    Free { addr: usize },
}

pub(crate) struct FakeEngine {
    id: String,
    init_status: AtomicI32,
    shutdown_status: c_int,
    responder: Responder,
    calls: Mutex<Vec<Call>>,
    live: Mutex<HashMap<usize, Box<[u8]>>>,
    graveyard: Mutex<Vec<Box<[u8]>>>,
    bad_frees: Mutex<Vec<usize>>,
}

impl FakeEngine {
    pub(crate) fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str, c_int) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        let n = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        Self {
            id: format!("fake-engine-{n}"),
            init_status: AtomicI32::new(0),
            shutdown_status: 0,
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            live: Mutex::new(HashMap::new()),
            graveyard: Mutex::new(Vec::new()),
            bad_frees: Mutex::new(Vec::new()),
        }
    }

    /// Answer every hint with the same text.
    pub(crate) fn returning(text: &str) -> Self {
        Self::returning_bytes(text.as_bytes().to_vec())
    }

    pub(crate) fn returning_bytes(bytes: Vec<u8>) -> Self {
        Self::with_responder(move |_, _| Some(bytes.clone()))
    }

    pub(crate) fn with_init_status(self, status: c_int) -> Self {
        self.set_init_status(status);
        self
    }

    /// Change what later `init` calls report.
    pub(crate) fn set_init_status(&self, status: c_int) {
        self.init_status.store(status, Ordering::SeqCst);
    }

    pub(crate) fn with_shutdown_status(mut self, status: c_int) -> Self {
        self.shutdown_status = status;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn hint_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Hint { .. }))
    }

    pub(crate) fn free_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Free { .. }))
    }

    pub(crate) fn freed_addresses(&self) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::Free { addr } => Some(*addr),
                _ => None,
            })
            .collect()
    }

    /// Buffers handed out and not yet freed.
    pub(crate) fn live_buffers(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    /// Frees of pointers that were not live: double frees or foreign pointers.
    pub(crate) fn bad_frees(&self) -> Vec<usize> {
        self.bad_frees.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl NativeEngine for FakeEngine {
    fn module_id(&self) -> &str {
        &self.id
    }

    fn init(&self) -> c_int {
        self.record(Call::Init);
        self.init_status.load(Ordering::SeqCst)
    }

    fn shutdown(&self) -> c_int {
        self.record(Call::Shutdown);
        self.shutdown_status
    }

    fn hint(&self, position_id: &CStr, depth: c_int) -> *mut c_char {
        let position_id = position_id.to_string_lossy().into_owned();
        let response = (self.responder)(&position_id, depth);
        self.record(Call::Hint { position_id, depth });

        let Some(mut bytes) = response else {
            return std::ptr::null_mut();
        };
        bytes.push(0);
        let mut buffer = bytes.into_boxed_slice();
        let ptr = buffer.as_mut_ptr().cast::<c_char>();
        self.live.lock().unwrap().insert(ptr as usize, buffer);
        ptr
    }

    unsafe fn free(&self, ptr: *mut c_char) {
        let addr = ptr as usize;
        self.record(Call::Free { addr });
        match self.live.lock().unwrap().remove(&addr) {
            Some(mut buffer) => {
                let end = buffer.len() - 1;
                buffer[..end].fill(0xFF);
                self.graveyard.lock().unwrap().push(buffer);
            }
            None => self.bad_frees.lock().unwrap().push(addr),
        }
    }
}
