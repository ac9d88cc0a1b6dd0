//! Mock backend for running the service without a hosted agent.
//!
//! [`MockBackend`] returns pre-configured replies in order, allowing
//! deterministic tests of everything downstream of the agent call.
//!
//! # Example
//!
//! ```
//! use storycircuit::backend::MockBackend;
//!
//! let mock = MockBackend::fixed("## A) Plan\n**Hook:** Hello");
//! assert_eq!(mock.calls(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{AgentBackend, AgentReply, AgentRequest};
use crate::error::{ContentError, Result};

#[derive(Debug)]
enum Behavior {
    Replies(Vec<String>),
    Fail(String),
}

/// A test backend that returns canned replies in order.
///
/// Cycles back to the beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    behavior: Behavior,
    delay: Option<Duration>,
    index: AtomicUsize,
}

impl MockBackend {
    pub const NAME: &'static str = "mock";

    /// Create a mock backend with the given canned replies.
    ///
    /// Replies are returned in order. When exhausted, cycles from the beginning.
    pub fn new(replies: Vec<String>) -> Self {
        assert!(!replies.is_empty(), "MockBackend requires at least one reply");
        Self {
            behavior: Behavior::Replies(replies),
            delay: None,
            index: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always returns the same reply.
    pub fn fixed(reply: impl Into<String>) -> Self {
        Self::new(vec![reply.into()])
    }

    /// Create a mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(message.into()),
            delay: None,
            index: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering, to exercise caller timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `complete` calls received so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AgentBackend for MockBackend {
    async fn complete(&self, request: &AgentRequest) -> Result<AgentReply> {
        let idx = self.index.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Replies(replies) => Ok(AgentReply {
                text: replies[idx % replies.len()].clone(),
                metadata: Some(serde_json::json!({
                    "agent": request.agent_name,
                    "prompt_length": request.prompt.len(),
                })),
            }),
            Behavior::Fail(message) => Err(ContentError::Agent {
                agent: request.agent_name.clone(),
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AgentRequest {
        AgentRequest {
            agent_name: "test-agent".to_string(),
            prompt: "Generate technical content about: Rust".to_string(),
        }
    }

    #[tokio::test]
    async fn fixed_reply() {
        let mock = MockBackend::fixed("Hello!");
        let reply = mock.complete(&request()).await.unwrap();
        assert_eq!(reply.text, "Hello!");
        assert_eq!(reply.metadata.unwrap()["agent"], "test-agent");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn cycles_replies() {
        let mock = MockBackend::new(vec!["first".into(), "second".into()]);
        let r1 = mock.complete(&request()).await.unwrap();
        let r2 = mock.complete(&request()).await.unwrap();
        let r3 = mock.complete(&request()).await.unwrap();
        assert_eq!(r1.text, "first");
        assert_eq!(r2.text, "second");
        assert_eq!(r3.text, "first"); // cycles
    }

    #[tokio::test]
    async fn failing_mock_reports_agent_error() {
        let mock = MockBackend::failing("service unavailable");
        let err = mock.complete(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            ContentError::Agent { ref agent, ref message }
                if agent == "test-agent" && message == "service unavailable"
        ));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn delayed_reply() {
        let mock = MockBackend::fixed("late").with_delay(Duration::from_millis(10));
        let reply = mock.complete(&request()).await.unwrap();
        assert_eq!(reply.text, "late");
    }

    #[test]
    fn usable_as_trait_object() {
        let backend: std::sync::Arc<dyn AgentBackend> = std::sync::Arc::new(MockBackend::fixed("x"));
        assert_eq!(backend.name(), "mock");
    }
}
