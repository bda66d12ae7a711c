//! The raw entry points a session drives.

use std::ffi::{c_char, c_int, CStr};

/// Raw entry points of a loaded analysis engine.
///
/// ```c
/// int init(void);
/// int shutdown(void);
/// const char *hint(const char *xgid, int nPlies);
/// void free(void *ptr);
/// ```
///
/// Implementations forward to the engine unchanged. Lifecycle ordering,
/// argument marshalling, and buffer ownership are enforced by
/// [`EngineSession`](crate::EngineSession), not here.
pub trait NativeEngine: Send + Sync {
    /// Identifier of the underlying module. Two handles onto the same
    /// process-wide module must report the same id, however they were
    /// opened.
    fn module_id(&self) -> &str;

    /// Prepare the engine's internal state. Zero means success.
    fn init(&self) -> c_int;

    /// Release the engine's internal state. Zero means success.
    fn shutdown(&self) -> c_int;

    /// Analyse a position. Returns a newly allocated NUL-terminated buffer
    /// owned by the caller, or null.
    fn hint(&self, position_id: &CStr, depth: c_int) -> *mut c_char;

    /// Release a buffer returned by [`NativeEngine::hint`].
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null, must come from `hint` on this engine, and
    /// must not have been released already.
    unsafe fn free(&self, ptr: *mut c_char);
}

