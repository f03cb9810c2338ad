//! Loading and driving the embedded engine through its C entry points.

pub mod args;
pub mod ffi;
pub mod library;

pub use ffi::{DisplayServerInterface, RawEngineEvent, UserData, MAIN_WINDOW_ID};
pub use library::{EngineInstance, EngineLoadError, LibEngine};
