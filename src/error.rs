//! Error types shared by the graph model and its serializers.

/// Errors that can occur while constructing or reading a dependency graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A required identifying field was empty or missing.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument or field.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A serialized node carried a `$type` discriminator we do not know.
    #[error("Unknown node type discriminator: {0}")]
    UnknownNodeType(String),

    /// Failed to parse or produce JSON content.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read, write, or resolve the working directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// Shorthand for an [`GraphError::InvalidArgument`] about an empty value.
    pub(crate) fn empty(name: &'static str) -> Self {
        Self::InvalidArgument {
            name,
            reason: "value must not be empty".to_string(),
        }
    }
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
