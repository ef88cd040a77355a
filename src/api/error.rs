//! Gym API Error Types
//!
//! Failures of a single request against the occupancy or route-set
//! endpoints. Callers treat every variant the same way (the view shows an
//! alert); the variants exist for logging.

use thiserror::Error;

/// Errors that can occur when talking to the gym APIs
#[derive(Error, Debug)]
pub enum ApiError {
    /// The endpoint answered with a non-success status
    #[error("Network response was not ok")]
    Network,

    /// The request never produced a response (connect, DNS, timeout)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the JSON we expected
    #[error("Invalid response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Result type for gym API operations
pub type ApiResult<T> = Result<T, ApiError>;
