//! Ownership of engine-allocated result buffers.

use crate::engine::NativeEngine;
use crate::error::DecodeError;
use std::ffi::{c_char, CStr};
use std::ptr::NonNull;

/// A NUL-terminated buffer returned by the engine's `hint` entry point.
///
/// The buffer is released through the engine's deallocator exactly once:
/// either by [`NativeBuffer::into_text`] after the contents have been
/// copied, or by `Drop` on any other exit path.
pub(crate) struct NativeBuffer<'a, E: NativeEngine + ?Sized> {
    ptr: NonNull<c_char>,
    engine: &'a E,
}

impl<'a, E: NativeEngine + ?Sized> NativeBuffer<'a, E> {
    /// Take ownership of a pointer returned by `engine.hint`.
    ///
    /// Returns `None` for null, which the engine uses for "no result" and
    /// which must not be passed to the deallocator.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must point to a NUL-terminated buffer returned by
    /// `engine.hint` that nothing else will read or release.
    pub(crate) unsafe fn from_raw(engine: &'a E, ptr: *mut c_char) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, engine })
    }

    fn as_c_str(&self) -> &CStr {
        // SAFETY: `from_raw` contract; the buffer stays live until drop
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }

    /// Length in bytes, excluding the terminator.
    pub(crate) fn len(&self) -> usize {
        self.as_c_str().to_bytes().len()
    }

    /// Copy the contents into host memory, release the buffer, then check
    /// the copy is UTF-8.
    pub(crate) fn into_text(self) -> Result<String, DecodeError> {
        let bytes = self.as_c_str().to_bytes().to_vec();
        drop(self);
        Ok(String::from_utf8(bytes)?)
    }
}

impl<E: NativeEngine + ?Sized> Drop for NativeBuffer<'_, E> {
    fn drop(&mut self) {
        // SAFETY: sole owner of a live `hint` buffer; drop runs once
        unsafe { self.engine.free(self.ptr.as_ptr()) }
    }
}
