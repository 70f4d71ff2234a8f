//! Window runtime.
//!
//! Owns the winit event loop, the window, and the native GL context bound
//! to it; drives an [`App`] with translated events and per-frame callbacks.

mod runtime;

pub use runtime::{App, Control, EngineCtx, Runtime};
