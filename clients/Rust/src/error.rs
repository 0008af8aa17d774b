use thiserror::Error;

/// Result type for solver API client operations
pub type Result<T> = std::result::Result<T, SolverError>;

/// Errors that can occur when using the solver API client
#[derive(Error, Debug)]
pub enum SolverError {
    /// The request could not complete (connection refused, timeout, reset)
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL provided
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The solver answered with a non-success status
    #[error("Solver returned status {status}: {body}")]
    Response { status: u16, body: String },

    /// The solver answered with something other than JSON
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SolverError {
    /// True when the server was reached but its answer was unusable.
    pub fn is_response_error(&self) -> bool {
        matches!(
            self,
            SolverError::Response { .. }
                | SolverError::UnexpectedContentType(_)
                | SolverError::ParseError(_)
        )
    }

    /// True when the request never produced a response.
    pub fn is_network_error(&self) -> bool {
        matches!(self, SolverError::Network(_))
    }
}
