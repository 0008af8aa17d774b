use std::time::Duration;

use crate::error::{Result, SolverError};
use crate::types::{Solution, SubmissionPayload};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

/// Path of the solver's submission endpoint
pub const SUBMIT_PATH: &str = "/api/home";

/// HTTP client for the MILP solver API
#[derive(Debug, Clone)]
pub struct SolverClient {
    client: Client,
    base_url: Url,
}

impl SolverClient {
    /// Create a new solver API client
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the solver API (e.g., "http://127.0.0.1:8080")
    ///
    /// # Example
    ///
    /// ```no_run
    /// use milp_api_sdk::SolverClient;
    ///
    /// let client = SolverClient::new("http://127.0.0.1:8080").unwrap();
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new solver API client with custom reqwest client
    ///
    /// This allows you to configure timeouts, proxies, etc.
    pub fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self> {
        let base_url =
            Url::parse(base_url.as_ref()).map_err(|e| SolverError::InvalidUrl(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submit a problem and wait for the decoded solution
    ///
    /// The request is sent exactly once; there is no retry.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use milp_api_sdk::{ProblemType, SolverClient, SolverDirection, SubmissionBuilder};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SolverClient::new("http://127.0.0.1:8080")?;
    ///
    /// let payload = SubmissionBuilder::new(ProblemType::MathematicalOptimization)
    ///     .add_variable("x^{I}")
    ///     .add_constraint("x_i <= 1 /forall_i^{I}")
    ///     .objective("/sum_i^{I} x_i", Some(SolverDirection::Maximize))
    ///     .build()?;
    ///
    /// let solution = client.solve(payload).await?;
    /// println!("Result: {:?}", solution.result);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn solve(&self, payload: SubmissionPayload) -> Result<Solution> {
        let url = self
            .base_url
            .join(SUBMIT_PATH)
            .map_err(|e| SolverError::InvalidUrl(e.to_string()))?;

        let form = payload.into_form()?;
        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(SolverError::Response {
                status: status.as_u16(),
                body: error_text,
            });
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default().to_string();
            if !content_type.to_ascii_lowercase().contains("json") {
                return Err(SolverError::UnexpectedContentType(content_type));
            }
        }

        let body = response.bytes().await?;
        let solution: Solution =
            serde_json::from_slice(&body).map_err(|e| SolverError::ParseError(e.to_string()))?;

        Ok(solution)
    }
}
