use async_trait::async_trait;
use milp_api_sdk::{Solution, SolverClient, SolverError, SubmissionPayload};

/// Common interface for anything that can run a submitted problem
#[async_trait]
pub trait SolveTransport: Send + Sync {
    /// Send the payload once and wait for the decoded solution
    ///
    /// # Arguments
    /// * `payload` - Problem type, flattened field groups and data files
    ///
    /// # Returns
    /// The solver's response, or a network/response error. Never retried.
    async fn post(&self, payload: SubmissionPayload) -> Result<Solution, SolverError>;

    /// Get the transport name for logging/debugging
    fn name(&self) -> &str;
}

#[async_trait]
impl SolveTransport for SolverClient {
    async fn post(&self, payload: SubmissionPayload) -> Result<Solution, SolverError> {
        self.solve(payload).await
    }

    fn name(&self) -> &str {
        self.base_url().as_str()
    }
}
