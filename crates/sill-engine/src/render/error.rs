use thiserror::Error;

use sill_vertex::FormatError;

/// Failure while registering buffers or reconciling them against a
/// program's inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("buffer {buffer} declares {names} attribute name(s) for {slots} named layout slot(s)")]
    NameCount { buffer: usize, names: usize, slots: usize },

    #[error("no registered buffer satisfies program attribute(s): {}", missing.join(", "))]
    Unsatisfied { missing: Vec<String> },

    #[error("attribute {name:?} is active in the program but has no location")]
    NoLocation { name: String },

    #[error("driver refused to allocate a GPU object: {0}")]
    Allocation(String),
}

/// Compile/link failure, carrying the driver's log verbatim.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to allocate a shader object: {0}")]
    Allocation(String),

    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: &'static str, log: String },

    #[error("program failed to link: {log}")]
    Link { log: String },
}
