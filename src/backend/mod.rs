//! Agent backend trait and normalized request/reply types.
//!
//! The [`AgentBackend`] trait abstracts over however the hosted content agent
//! is reached. [`ContentService`](crate::ContentService) only ever sees an
//! `Arc<dyn AgentBackend>`; the crate ships [`MockBackend`] for deterministic
//! runs and tests.
//!
//! ```text
//! ContentService ──► AgentRequest ──► AgentBackend::complete() ──► AgentReply
//!                                              │
//!                                         MockBackend
//! ```

pub mod mock;

pub use mock::MockBackend;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A request for one content pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    /// Name of the hosted agent to run.
    pub agent_name: String,

    /// The rendered prompt (see [`build_prompt`](crate::prompt::build_prompt)).
    pub prompt: String,
}

/// What the agent sent back.
#[derive(Debug, Clone, Default)]
pub struct AgentReply {
    /// The reply text, unparsed.
    pub text: String,

    /// Transport-specific metadata (token counts, run ids). Stored as raw
    /// JSON because every transport reports different fields.
    pub metadata: Option<Value>,
}

/// Abstraction over agent transports.
///
/// Errors are reported as [`ContentError::Agent`](crate::ContentError::Agent);
/// timeouts are enforced by the caller.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn AgentBackend>`.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn complete(&self, request: &AgentRequest) -> Result<AgentReply>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}
