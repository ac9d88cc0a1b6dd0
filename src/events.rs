//! Event system for generation lifecycle hooks.
//!
//! Provides an optional, non-intrusive way to observe
//! [`ContentService::generate`](crate::ContentService::generate). The service
//! emits events when a request starts, when the agent is called and answers,
//! when the reply has been parsed, and when the request finishes. Implement
//! [`EventHandler`] to receive them for progress tracking or audit trails.

use std::sync::Arc;

use uuid::Uuid;

use crate::diagnostics::Quality;
use crate::types::Platform;

/// Events emitted while generating a content pack.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A request passed validation and is about to reach the agent.
    GenerationStart {
        topic: String,
        platforms: Vec<Platform>,
    },
    /// A request was refused before the agent was called.
    Rejected {
        /// Human-readable rejection message.
        reason: String,
    },
    /// The agent is being called.
    AgentCall {
        agent: String,
        /// Length of the rendered prompt in bytes.
        prompt_length: usize,
    },
    /// The agent answered.
    AgentReply {
        agent: String,
        /// Length of the raw reply in bytes.
        reply_length: usize,
        elapsed_ms: u64,
    },
    /// The reply was turned into a record.
    Parsed {
        /// Winning extraction strategy; `None` when the fallback record was used.
        strategy: Option<&'static str>,
        quality: Quality,
    },
    /// The request has finished.
    GenerationEnd {
        /// Id of the new record, when one was produced.
        id: Option<Uuid>,
        ok: bool,
    },
}

/// Handler for generation lifecycle events.
///
/// This is entirely optional -- the service works without an event handler.
///
/// # Example
///
/// ```
/// use storycircuit::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         match event {
///             Event::GenerationStart { topic, .. } => println!("[start] {}", topic),
///             Event::Parsed { quality, .. } => println!("[parsed] {}", quality),
///             Event::GenerationEnd { ok, .. } => println!("[end] ok={}", ok),
///             _ => {} // Rejected, AgentCall, AgentReply
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called when the service emits an event.
    fn on_event(&self, event: Event);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: Event) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
///
/// # Example
///
/// ```
/// use storycircuit::events::{Event, FnEventHandler};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: Event| {
///     if let Event::Rejected { reason } = event {
///         eprintln!("rejected: {}", reason);
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}
