//! # lib-engine-ffi
//!
//! Safe FFI wrapper for the precompiled backgammon hint engine.
//!
//! This crate loads the engine as an opaque shared library and drives it
//! through a narrow, string-based interface. It handles:
//!
//! - Dynamic library loading with `libloading`
//! - Engine lifecycle management (init / hint / shutdown)
//! - Ownership of engine-allocated result buffers
//! - Decoding engine output as JSON
//!
//! The analysis itself happens entirely inside the engine.
//!
//! # Safety
//!
//! 1. **State machine**: session states prevent calls outside init/shutdown
//! 2. **Buffer ownership**: every buffer the engine returns is freed exactly
//!    once, after its contents are copied out
//! 3. **Exclusivity**: one ready session per module, and `&mut` access (or a
//!    lock) for every engine call
//!
//! ```ignore
//! let library = EngineLibrary::load("./libgnubg-core.so")?;
//! let mut session = EngineSession::new(library);
//! session.initialize()?;
//! let result = session.evaluate("XGID=-b----E-C---eE---c-e----B-:0:0:1:52:0:0:0:5:10", 2)?;
//! session.teardown()?;
//! ```

pub mod error;
pub mod engine;
pub mod loader;
pub mod lifecycle;
pub mod shared;

mod buffer;
mod hint;
mod sync;

#[cfg(test)]
mod fake;

pub use engine::NativeEngine;
pub use error::{EngineError, EngineResult};
pub use lifecycle::{is_module_active, EngineSession, SessionState};
pub use loader::{EngineLibrary, LibraryFormat, LibraryInfo, SymbolNames, ENGINE_MODULE_ID};
pub use shared::SharedEngineSession;
