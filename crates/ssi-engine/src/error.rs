//! Errors raised by hosts, data objects and extension functions.
//!
//! The processor never returns these to its caller. They are logged and the
//! failing source is treated as a miss.

/// Error reported by a resolution source.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The source does not know the requested name.
    #[error("{0} not found")]
    NotFound(String),
    /// The source knows the name but failed while producing a value.
    #[error("invoking {name} failed: {message}")]
    Invocation {
        /// Attribute or method name.
        name: String,
        /// Human-readable failure description.
        message: String,
    },
}

impl ScriptError {
    /// Create an invocation error for `name`.
    #[must_use]
    pub fn invocation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            name: name.into(),
            message: message.into(),
        }
    }
}
