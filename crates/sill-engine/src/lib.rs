//! Sill engine crate.
//!
//! Owns the platform pieces used by higher layers: the window runtime, the
//! OpenGL context backends, and the render-graph layer (typed buffers,
//! shader programs, per-program vertex-array caching).

pub mod config;
pub mod context;
pub mod event;
pub mod logging;
pub mod render;
pub mod shader;
pub mod window;
