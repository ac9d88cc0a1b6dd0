use std::time::Duration;
use thiserror::Error;

use crate::security::Rejection;

/// Errors produced by the generation service and its collaborators.
///
/// Reply parsing never produces one of these: [`ResponseParser`](crate::ResponseParser)
/// is total and degrades to a fallback record instead.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The request was rejected by the content scanner before the agent was called.
    #[error("Request rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The agent backend failed (service unavailable, bad response, etc.).
    #[error("Agent '{agent}' failed: {message}")]
    Agent { agent: String, message: String },

    /// The agent did not reply within the configured timeout.
    #[error("Agent call timed out after {0:?}")]
    AgentTimeout(Duration),

    /// JSON serialization failed at the serde level.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration detected while loading settings.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ContentError>;
