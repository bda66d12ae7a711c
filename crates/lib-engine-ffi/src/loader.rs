//! Dynamic library loading for the hint engine.
//!
//! This module handles loading the precompiled engine and extracting
//! its entry points.

use crate::engine::NativeEngine;
use crate::error::{EngineError, EngineResult};
use libloading::Library;
use serde::{Deserialize, Serialize};
use std::ffi::{c_char, c_int, c_void, CStr};
use std::path::Path;
use std::sync::Arc;

/// Function signature for `init`.
///
/// ```c
/// int init(void);
/// ```
pub type EngineInitFn = unsafe extern "C" fn() -> c_int;

/// Function signature for `shutdown`.
///
/// ```c
/// int shutdown(void);
/// ```
pub type EngineShutdownFn = unsafe extern "C" fn() -> c_int;

/// Function signature for `hint`.
///
/// ```c
/// const char *hint(const char *xgid, int nPlies);
/// ```
pub type EngineHintFn = unsafe extern "C" fn(xgid: *const c_char, n_plies: c_int) -> *mut c_char;

/// Function signature for the deallocator paired with `hint`.
///
/// ```c
/// void free(void *ptr);
/// ```
pub type EngineFreeFn = unsafe extern "C" fn(ptr: *mut c_void);

/// Exported names of the engine entry points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolNames {
    pub init: String,
    pub shutdown: String,
    pub hint: String,
    /// Deallocator for hint buffers. Plain `free` resolves through the
    /// library's libc dependency.
    pub free: String,
}

impl Default for SymbolNames {
    fn default() -> Self {
        Self {
            init: "init".to_string(),
            shutdown: "shutdown".to_string(),
            hint: "hint".to_string(),
            free: "free".to_string(),
        }
    }
}

/// Module id shared by every loaded engine library.
///
/// `dlopen` hands back the same loaded object for a soname, an absolute
/// path, a relative path, or a symlink to one file, and the engine keeps its
/// state in globals. No path spelling identifies the module reliably, so all
/// libraries count as one module and at most one session is ready per
/// process.
pub const ENGINE_MODULE_ID: &str = "native-engine";

/// Loaded engine library with extracted function pointers.
pub struct EngineLibrary {
    /// Keeps the function pointers below valid.
    #[allow(dead_code)]
    library: Library,

    /// Path to the library file.
    pub path: String,

    engine_init: EngineInitFn,
    engine_shutdown: EngineShutdownFn,
    engine_hint: EngineHintFn,
    engine_free: EngineFreeFn,
}

impl EngineLibrary {
    /// Load the engine from a shared library file using the default
    /// symbol names.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Arc<Self>> {
        Self::load_with_symbols(path, &SymbolNames::default())
    }

    /// Load the engine from a shared library file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `.so`, `.dylib` or `.dll` file
    /// * `symbols` - Exported names of the four entry points
    ///
    /// # Safety
    ///
    /// The symbols must have the C signatures documented on the `Engine*Fn`
    /// aliases. A library exporting different signatures under these names
    /// causes undefined behavior on first call.
    pub fn load_with_symbols<P: AsRef<Path>>(
        path: P,
        symbols: &SymbolNames,
    ) -> EngineResult<Arc<Self>> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        // Loading runs the library's initializers; the engine's own state is
        // set up later by `init`.
        let library = unsafe { Library::new(path) }
            .map_err(|e| EngineError::load_error(&path_str, e))?;

        let engine_init: EngineInitFn = resolve(&library, &symbols.init)?;
        let engine_shutdown: EngineShutdownFn = resolve(&library, &symbols.shutdown)?;
        let engine_hint: EngineHintFn = resolve(&library, &symbols.hint)?;
        let engine_free: EngineFreeFn = resolve(&library, &symbols.free)?;

        tracing::info!(
            path = %path_str,
            format = ?LibraryFormat::from_path(path),
            "Loaded engine library"
        );

        Ok(Arc::new(Self {
            library,
            path: path_str,
            engine_init,
            engine_shutdown,
            engine_hint,
            engine_free,
        }))
    }

    /// Describe this library.
    pub fn info(&self) -> LibraryInfo {
        LibraryInfo {
            path: self.path.clone(),
            format: LibraryFormat::from_path(&self.path),
        }
    }
}

fn resolve<T: Copy>(library: &Library, name: &str) -> EngineResult<T> {
    // SAFETY: the caller picks `T` to match the exported signature
    unsafe {
        library
            .get::<T>(name.as_bytes())
            .map(|symbol| *symbol)
            .map_err(|_| EngineError::symbol_not_found(name))
    }
}

impl NativeEngine for EngineLibrary {
    fn module_id(&self) -> &str {
        ENGINE_MODULE_ID
    }

    fn init(&self) -> c_int {
        // SAFETY: resolved with the matching signature at load
        unsafe { (self.engine_init)() }
    }

    fn shutdown(&self) -> c_int {
        // SAFETY: resolved with the matching signature at load
        unsafe { (self.engine_shutdown)() }
    }

    fn hint(&self, position_id: &CStr, depth: c_int) -> *mut c_char {
        // SAFETY: `position_id` is NUL-terminated and outlives the call
        unsafe { (self.engine_hint)(position_id.as_ptr(), depth) }
    }

    unsafe fn free(&self, ptr: *mut c_char) {
        // SAFETY: caller guarantees `ptr` came from `hint` and is live
        unsafe { (self.engine_free)(ptr.cast::<c_void>()) }
    }
}

// The library handle and plain function pointers are safe to share; the
// engine's own lack of reentrancy is handled by `EngineSession`.
unsafe impl Send for EngineLibrary {}
unsafe impl Sync for EngineLibrary {}

/// Information about a loaded engine library.
#[derive(Clone, Debug)]
pub struct LibraryInfo {
    /// Path to the library.
    pub path: String,

    /// Platform-specific library format.
    pub format: LibraryFormat,
}

/// Platform-specific library format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryFormat {
    /// Windows DLL.
    Dll,
    /// Linux/Unix shared object.
    So,
    /// macOS dynamic library.
    Dylib,
    /// Unknown format.
    Unknown,
}

impl LibraryFormat {
    /// Detect format from file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("dll") | Some("DLL") => Self::Dll,
            Some("so") => Self::So,
            Some("dylib") => Self::Dylib,
            _ => Self::Unknown,
        }
    }

    /// Get the format used by the current platform.
    #[cfg(target_os = "windows")]
    pub fn native() -> Self {
        Self::Dll
    }

    #[cfg(target_os = "macos")]
    pub fn native() -> Self {
        Self::Dylib
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    pub fn native() -> Self {
        Self::So
    }

    /// Whether a library of this format can be loaded here.
    pub fn is_native(self) -> bool {
        self == Self::native()
    }
}
