//! Content generation: scan, prompt, call the agent, parse, record.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::backend::{AgentBackend, AgentRequest};
use crate::config::ServiceConfig;
use crate::error::{ContentError, Result};
use crate::events::{emit, Event, EventHandler};
use crate::parser::ResponseParser;
use crate::prompt::{build_prompt, PromptInput};
use crate::security::{ContentScanner, Rejection, AUDIENCE_MAX_CHARS, CONTEXT_MAX_CHARS};
use crate::types::{ContentRecord, GenerationMetadata, GenerationRequest, Platform};

/// Generates content packs through an [`AgentBackend`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use storycircuit::backend::MockBackend;
/// use storycircuit::{ContentService, GenerationRequest, Platform, ServiceConfig};
///
/// # tokio_test::block_on(async {
/// let reply = "## A) Plan\n**Hook:** Ship small.\n## B) Outputs\n### LinkedIn\nShip small, ship often.";
/// let service = ContentService::new(Arc::new(MockBackend::fixed(reply)), ServiceConfig::default());
///
/// let request = GenerationRequest::new("Release engineering", "user-1").with_platform("linkedin");
/// let record = service.generate(&request).await.unwrap();
///
/// assert_eq!(record.platforms, vec![Platform::Linkedin]);
/// assert_eq!(record.content.plan.hook, "Ship small.");
/// # });
/// ```
pub struct ContentService {
    backend: Arc<dyn AgentBackend>,
    parser: ResponseParser,
    scanner: ContentScanner,
    config: ServiceConfig,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl ContentService {
    pub fn new(backend: Arc<dyn AgentBackend>, config: ServiceConfig) -> Self {
        Self {
            backend,
            parser: ResponseParser::new(config.parser.clone()),
            scanner: ContentScanner::new(),
            config,
            event_handler: None,
        }
    }

    /// Replace the parser built from [`ServiceConfig::parser`], e.g. to add
    /// a custom strategy.
    pub fn with_parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn validate(&self, request: &GenerationRequest) -> std::result::Result<Vec<Platform>, Rejection> {
        let platforms = self.scanner.validate(&request.topic, &request.platforms)?;
        self.scanner
            .validate_optional("audience", request.audience.as_deref(), AUDIENCE_MAX_CHARS)?;
        self.scanner.validate_optional(
            "additional context",
            request.additional_context.as_deref(),
            CONTEXT_MAX_CHARS,
        )?;
        Ok(platforms)
    }

    /// Generate one content pack.
    ///
    /// A rejected request never reaches the backend. Parsing cannot fail: a
    /// reply the parser cannot make sense of still yields a record (see
    /// [`ContentRecord::report`]).
    pub async fn generate(&self, request: &GenerationRequest) -> Result<ContentRecord> {
        let platforms = match self.validate(request) {
            Ok(platforms) => platforms,
            Err(rejection) => {
                warn!(user_id = %request.user_id, reason = %rejection, "generation request rejected");
                emit(
                    &self.event_handler,
                    Event::Rejected {
                        reason: rejection.to_string(),
                    },
                );
                return Err(rejection.into());
            }
        };

        let audience = request.audience.as_deref().map(|a| self.scanner.sanitize(a));
        let context = request
            .additional_context
            .as_deref()
            .map(|c| self.scanner.sanitize(c));

        info!(
            topic = %request.topic,
            platforms = ?platforms,
            user_id = %request.user_id,
            "generating content"
        );
        emit(
            &self.event_handler,
            Event::GenerationStart {
                topic: request.topic.clone(),
                platforms: platforms.clone(),
            },
        );

        let prompt = build_prompt(&PromptInput {
            topic: &request.topic,
            platforms: &platforms,
            audience: audience.as_deref(),
            additional_context: context.as_deref(),
        });
        let agent_request = AgentRequest {
            agent_name: self.config.agent_name.clone(),
            prompt,
        };

        emit(
            &self.event_handler,
            Event::AgentCall {
                agent: agent_request.agent_name.clone(),
                prompt_length: agent_request.prompt.len(),
            },
        );

        let start = Instant::now();
        let reply = match tokio::time::timeout(
            self.config.agent_timeout,
            self.backend.complete(&agent_request),
        )
        .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!(backend = self.backend.name(), error = %e, "agent call failed");
                self.finish(None);
                return Err(e);
            }
            Err(_) => {
                error!(
                    backend = self.backend.name(),
                    timeout = ?self.config.agent_timeout,
                    "agent call timed out"
                );
                self.finish(None);
                return Err(ContentError::AgentTimeout(self.config.agent_timeout));
            }
        };
        let elapsed = start.elapsed();

        emit(
            &self.event_handler,
            Event::AgentReply {
                agent: agent_request.agent_name.clone(),
                reply_length: reply.text.len(),
                elapsed_ms: elapsed.as_millis() as u64,
            },
        );

        let outcome = self.parser.parse_with_report(&reply.text, &platforms);
        emit(
            &self.event_handler,
            Event::Parsed {
                strategy: outcome.report.strategy,
                quality: outcome.report.quality(),
            },
        );

        let record = ContentRecord {
            id: Uuid::new_v4(),
            topic: request.topic.clone(),
            platforms,
            content: outcome.content,
            metadata: GenerationMetadata {
                generated_at: Utc::now(),
                duration_secs: elapsed.as_secs_f64(),
                user_id: request.user_id.clone(),
                agent_version: self.config.agent_version.clone(),
            },
            report: outcome.report,
        };

        info!(
            id = %record.id,
            duration_secs = record.metadata.duration_secs,
            quality = %record.report.quality(),
            outputs = record.content.outputs.len(),
            "content generated"
        );
        self.finish(Some(record.id));
        Ok(record)
    }

    fn finish(&self, id: Option<Uuid>) {
        emit(
            &self.event_handler,
            Event::GenerationEnd {
                id,
                ok: id.is_some(),
            },
        );
    }
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("backend", &self.backend.name())
            .field("parser", &self.parser)
            .field("config", &self.config)
            .field("event_handler", &self.event_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::backend::MockBackend;
    use crate::diagnostics::Quality;
    use crate::events::FnEventHandler;
    use crate::types::HistoryItem;

    const REPLY: &str = "\
## A) Plan
**Hook:** Agents need orchestration.
**Narrative Frame:** Problem -> Fix
**Key Points:**
- Routing
- Retries
**Example:** A triage bot.
**CTA:** Try it.

## B) Platform Outputs
### LinkedIn
Orchestration is the product.
**Hashtags:** #AI
### Twitter
1/ Orchestration matters.
";

    fn request() -> GenerationRequest {
        GenerationRequest::new("AI agent orchestration", "user-42")
            .with_platform("linkedin")
            .with_platform("twitter")
    }

    fn recording_handler() -> (Arc<Mutex<Vec<Event>>>, Arc<dyn EventHandler>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let handler: Arc<dyn EventHandler> =
            Arc::new(FnEventHandler(move |e: Event| sink.lock().unwrap().push(e)));
        (events, handler)
    }

    #[tokio::test]
    async fn generates_record_from_reply() {
        let service = ContentService::new(Arc::new(MockBackend::fixed(REPLY)), ServiceConfig::default());
        let record = service.generate(&request()).await.unwrap();

        assert_eq!(record.topic, "AI agent orchestration");
        assert_eq!(record.platforms, vec![Platform::Linkedin, Platform::Twitter]);
        assert_eq!(record.content.plan.hook, "Agents need orchestration.");
        assert_eq!(record.content.plan.key_points, vec!["Routing", "Retries"]);
        assert_eq!(record.content.output(Platform::Linkedin).unwrap().hashtags, vec!["#AI"]);
        assert_eq!(record.content.notes, REPLY);
        assert_eq!(record.metadata.user_id, "user-42");
        assert_eq!(record.metadata.agent_version, "storycircuit-v1.0");
        assert_eq!(record.report.strategy, Some("heuristic"));
        assert_eq!(record.id.get_version_num(), 4);

        let history = HistoryItem::from(&record);
        assert_eq!(history.summary, "Agents need orchestration.");
    }

    #[tokio::test]
    async fn rejected_request_never_reaches_backend() {
        let backend = Arc::new(MockBackend::fixed(REPLY));
        let service = ContentService::new(backend.clone(), ServiceConfig::default());

        let bad_topic = GenerationRequest::new("password: hunter2", "u").with_platform("blog");
        let err = service.generate(&bad_topic).await.unwrap_err();
        assert!(matches!(err, ContentError::Rejected(Rejection::RestrictedContent(_))));

        let bad_platform = GenerationRequest::new("Rust tips", "u").with_platform("myspace");
        let err = service.generate(&bad_platform).await.unwrap_err();
        assert!(matches!(err, ContentError::Rejected(Rejection::UnsupportedPlatform(_))));

        let long_audience = GenerationRequest::new("Rust tips", "u")
            .with_platform("blog")
            .with_audience("a".repeat(201));
        let err = service.generate(&long_audience).await.unwrap_err();
        assert!(matches!(
            err,
            ContentError::Rejected(Rejection::FieldTooLong { field: "audience", .. })
        ));

        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn timeout_maps_to_agent_timeout() {
        let backend = MockBackend::fixed(REPLY).with_delay(Duration::from_millis(500));
        let config = ServiceConfig::default().with_agent_timeout(Duration::from_millis(20));
        let service = ContentService::new(Arc::new(backend), config);

        let err = service.generate(&request()).await.unwrap_err();
        assert!(matches!(err, ContentError::AgentTimeout(t) if t == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn backend_failure_is_agent_error() {
        let service = ContentService::new(
            Arc::new(MockBackend::failing("503 service unavailable")),
            ServiceConfig::default().with_agent_name("Custom-Agent"),
        );
        let err = service.generate(&request()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Agent 'Custom-Agent' failed: 503 service unavailable"
        );
    }

    #[tokio::test]
    async fn unparseable_reply_still_yields_record() {
        let service = ContentService::new(Arc::new(MockBackend::fixed("")), ServiceConfig::default());
        let record = service.generate(&request()).await.unwrap();
        assert_eq!(record.report.quality(), Quality::Degraded);
        assert!(record.content.outputs.is_empty());
        assert_eq!(record.content.notes, "Error: empty agent reply");
        assert_eq!(HistoryItem::from(&record).summary, "Content generated successfully");
    }

    #[tokio::test]
    async fn lifecycle_events_in_order() {
        let (events, handler) = recording_handler();
        let service = ContentService::new(Arc::new(MockBackend::fixed(REPLY)), ServiceConfig::default())
            .with_event_handler(handler);
        let record = service.generate(&request()).await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], Event::GenerationStart { .. }));
        assert!(matches!(events[1], Event::AgentCall { prompt_length, .. } if prompt_length > 0));
        assert!(matches!(events[2], Event::AgentReply { reply_length, .. } if reply_length == REPLY.len()));
        assert!(matches!(events[3], Event::Parsed { strategy: Some("heuristic"), .. }));
        assert_eq!(events[4], Event::GenerationEnd { id: Some(record.id), ok: true });
    }

    #[tokio::test]
    async fn rejection_emits_single_event() {
        let (events, handler) = recording_handler();
        let service = ContentService::new(Arc::new(MockBackend::fixed(REPLY)), ServiceConfig::default())
            .with_event_handler(handler);
        let empty = GenerationRequest::new("", "u").with_platform("blog");
        assert!(service.generate(&empty).await.is_err());

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![Event::Rejected {
                reason: "Topic cannot be empty".to_string()
            }]
        );
    }

    #[test]
    fn sanitized_context_reaches_prompt() {
        struct Capture(Mutex<Option<String>>);

        #[async_trait::async_trait]
        impl AgentBackend for Capture {
            async fn complete(&self, request: &AgentRequest) -> Result<crate::backend::AgentReply> {
                *self.0.lock().unwrap() = Some(request.prompt.clone());
                Ok(crate::backend::AgentReply::default())
            }

            fn name(&self) -> &'static str {
                "capture"
            }
        }

        let backend = Arc::new(Capture(Mutex::new(None)));
        let service = ContentService::new(backend.clone(), ServiceConfig::default());
        let request = request()
            .with_audience("engineers")
            .with_context("Questions to dev@example.com");

        tokio_test::block_on(service.generate(&request)).unwrap();

        let prompt = backend.0.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Target audience: engineers"));
        assert!(prompt.contains("Additional context: Questions to [EMAIL-REMOVED]"));
        assert!(prompt.contains("Target platforms: linkedin, twitter"));
    }
}
