use std::fmt;

/// A malformed token in a vertex-format descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// The offending token, verbatim.
    pub token: String,
    pub message: String,
}

impl FormatError {
    pub(crate) fn new(token: &str, message: impl Into<String>) -> Self {
        Self { token: token.to_string(), message: message.into() }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vertex format error in token {:?}: {}", self.token, self.message)
    }
}

impl std::error::Error for FormatError {}
