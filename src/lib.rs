//! # StoryCircuit
//!
//! Turns the free-form replies of a content-writing agent into stable,
//! always-valid social-media content packs.
//!
//! The agent is asked for a content plan plus one output per platform, but
//! what comes back may be JSON, markdown, or something in between. The
//! [`ResponseParser`] never fails: it tries a list of extraction strategies
//! and degrades to a fallback record, so every reply yields a
//! [`ParsedContent`] with a complete plan and a (possibly empty) set of
//! platform outputs.
//!
//! ## Core Concepts
//!
//! - **[`ResponseParser`]**: ordered [`ExtractionStrategy`] list (whole-reply
//!   JSON, fenced JSON, markdown heuristics) plus the fallback record.
//! - **[`ExtractionReport`]**: side information on how a reply was parsed
//!   and a coarse [`Quality`] grade.
//! - **[`ContentScanner`]**: rejects requests carrying credentials, PII or
//!   confidentiality markers, and redacts free text.
//! - **[`ContentService`]**: scan, prompt, call an [`AgentBackend`], parse,
//!   and return a [`ContentRecord`].
//! - **[`export`]**: Markdown and JSON documents for a record.
//!
//! ## Quick Start
//!
//! ```
//! use storycircuit::{parse_response, Platform};
//!
//! let reply = "\
//! ## A) Plan
//! **Hook:** Most teams get agent orchestration wrong.
//! **Key Points:**
//! - Sequential vs parallel
//! - Error handling
//!
//! ## B) Platform Outputs
//! ### Twitter
//! 1/ Agents need a conductor.
//! **Hashtags:** #AI #Tech
//! ";
//!
//! let content = parse_response(reply, &[Platform::Twitter, Platform::Github]);
//! assert_eq!(content.plan.hook, "Most teams get agent orchestration wrong.");
//! assert_eq!(content.plan.key_points.len(), 2);
//! assert_eq!(content.output(Platform::Twitter).unwrap().hashtags, vec!["#AI", "#Tech"]);
//! assert!(content.output(Platform::Github).is_none());
//! ```
//!
//! ## Generation with a mock agent
//!
//! ```
//! use std::sync::Arc;
//! use storycircuit::backend::MockBackend;
//! use storycircuit::export::{to_markdown, PlatformFilter};
//! use storycircuit::{ContentService, GenerationRequest, ServiceConfig};
//!
//! # tokio_test::block_on(async {
//! let service = ContentService::new(
//!     Arc::new(MockBackend::fixed("Plain prose from the agent.")),
//!     ServiceConfig::default(),
//! );
//! let request = GenerationRequest::new("Rust error handling", "user-1").with_platform("blog");
//! let record = service.generate(&request).await.unwrap();
//!
//! let markdown = to_markdown(&record, PlatformFilter::All);
//! assert!(markdown.starts_with("# Rust error handling"));
//! # });
//! ```

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod export;
pub mod extract;
pub mod parser;
pub mod prompt;
pub mod security;
pub mod service;
pub mod types;

pub use backend::{AgentBackend, AgentReply, AgentRequest, MockBackend};
pub use config::{ParserConfig, ServiceConfig};
pub use diagnostics::{ExtractionReport, Quality, StrategyFailure};
pub use error::{ContentError, Result};
pub use events::{Event, EventHandler, FnEventHandler};
pub use export::{ExportFormat, PlatformFilter};
pub use extract::{ExtractError, ExtractionStrategy};
pub use parser::{parse_response, ParseOutcome, ResponseParser};
pub use security::{ContentScanner, Finding, Rejection, SensitiveKind};
pub use service::ContentService;
pub use types::{
    ContentPlan, ContentRecord, GenerationMetadata, GenerationRequest, HistoryItem,
    ParsedContent, Platform, PlatformOutput, UnsupportedPlatform,
};
