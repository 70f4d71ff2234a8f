//! Shader source utilities.
//!
//! Textual preprocessing over GLSL sources: comment stripping, `#define`
//! injection, and scraping the interface `out` declarations used to bind
//! fragment outputs. All of it is plain scanning; GLSL has no string
//! literals and its preprocessor is line-oriented, so nothing heavier than
//! a character walk is needed.

mod preprocess;

pub use preprocess::{inject_defines, interface_outputs, strip_comments};
