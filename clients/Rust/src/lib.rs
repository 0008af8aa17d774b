//! # MILP Solver API Client
//!
//! A Rust client SDK for submitting mixed-integer linear programming problems
//! to the solver API and decoding its results.
//!
//! ## Example
//!
//! ```no_run
//! use milp_api_sdk::{FilePart, ProblemType, SolverClient, SubmissionBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SolverClient::new("http://127.0.0.1:8080")?;
//!
//!     let payload = SubmissionBuilder::new(ProblemType::PortfolioOptimization)
//!         .add_file(FilePart::new("stocks.csv", b"Ticker\nAAPL\nMSFT\n".to_vec()))
//!         .build()?;
//!
//!     let solution = client.solve(payload).await?;
//!     println!("Result: {:?}", solution.result);
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod client;
pub mod builder;
pub mod error;

pub use client::{SolverClient, SUBMIT_PATH};
pub use types::{
    fields, FilePart, Figures, Objective, Parameter, ProblemType, Record, Report, Solution,
    SolverDirection, SubmissionPayload,
};
pub use builder::SubmissionBuilder;
pub use error::{Result, SolverError};
