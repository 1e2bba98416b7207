//! Loader errors

/// Error type for option loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The request never produced a response (network down, CORS, aborted)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The body was not valid JSON or could not be converted
    #[error("JSON error: {0}")]
    Json(String),

    /// The body did not have the shape expected for this endpoint
    #[error("Unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),

    /// A wrapped response lacked its wrapping field
    #[error("Response is missing field `{0}`")]
    MissingField(String),
}

impl LoadError {
    /// The request itself failed (no usable response), as opposed to a
    /// response whose payload could not be read.
    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::Transport(_) | LoadError::Status { .. })
    }
}
