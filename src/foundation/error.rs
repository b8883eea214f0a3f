/// Convenience result type used across shelfkit.
pub type ShelfResult<T> = Result<T, ShelfError>;

/// Top-level error taxonomy used by tool operations.
#[derive(thiserror::Error, Debug)]
pub enum ShelfError {
    /// A required selection, node or attribute is missing or of the wrong type.
    ///
    /// Callers report these as warnings; nothing was mutated past the check.
    #[error("precondition not met: {0}")]
    Precondition(String),

    /// The current document has never been saved, so no path can be derived from it.
    #[error("document has not been saved: {0}")]
    Unsaved(String),

    /// Invalid user-provided names, plugs, settings or paths.
    #[error("validation error: {0}")]
    Validation(String),

    /// The scene graph rejected a query or mutation.
    #[error("scene graph error: {0}")]
    Graph(String),

    /// An external process could not be launched or exited unsuccessfully.
    #[error("process error: {0}")]
    Process(String),

    /// Errors when serializing or deserializing snapshots and configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShelfError {
    /// Build a [`ShelfError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`ShelfError::Unsaved`] value.
    pub fn unsaved(msg: impl Into<String>) -> Self {
        Self::Unsaved(msg.into())
    }

    /// Build a [`ShelfError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShelfError::Graph`] value.
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph(msg.into())
    }

    /// Build a [`ShelfError::Process`] value.
    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }

    /// Build a [`ShelfError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors that should surface as a warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
