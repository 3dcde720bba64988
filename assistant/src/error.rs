//! Error types for the assistant's completion call.

use thiserror::Error;

/// Errors that can occur while calling the completion endpoint.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Transport failure, timeout, or an undecodable response body.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {code} | {body}")]
    Status { code: u16, body: String },

    /// The response carried no completion choices.
    #[error("AI API returned no choices")]
    EmptyChoices,

    /// [`Assistant::complete`](crate::Assistant::complete) was called
    /// without an API key.
    #[error("no API key configured")]
    MissingApiKey,
}

/// Convenience alias for results with [`AssistantError`].
pub type Result<T> = std::result::Result<T, AssistantError>;
