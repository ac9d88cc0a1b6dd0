//! The reply parser: ordered strategies plus a fallback record.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ParserConfig;
use crate::diagnostics::ExtractionReport;
use crate::extract::fallback::fallback;
use crate::extract::strategy::{
    ExtractionStrategy, FencedJsonStrategy, HeuristicStrategy, JsonStrategy,
};
use crate::types::{ParsedContent, Platform};

/// A parsed record together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub content: ParsedContent,
    pub report: ExtractionReport,
}

/// Turns raw agent replies into [`ParsedContent`].
///
/// Total: every input, including the empty string and arbitrary garbage,
/// yields a structurally valid record. Strategies are tried in order and
/// the first success wins; when all fail the fallback record is produced.
///
/// # Example
///
/// ```
/// use storycircuit::{Platform, ResponseParser};
///
/// let parser = ResponseParser::default();
/// let reply = "## A) Plan\n**Hook:** Ship it.\n## B) Outputs\n### Twitter\nShipped.\n**Hashtags:** #AI #Tech";
/// let content = parser.parse(reply, &[Platform::Twitter]);
///
/// assert_eq!(content.plan.hook, "Ship it.");
/// assert_eq!(content.output(Platform::Twitter).unwrap().hashtags, vec!["#AI", "#Tech"]);
/// assert_eq!(content.notes, reply);
/// ```
#[derive(Clone)]
pub struct ResponseParser {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
}

impl ResponseParser {
    pub fn new(config: ParserConfig) -> Self {
        let mut strategies: Vec<Arc<dyn ExtractionStrategy>> = vec![Arc::new(JsonStrategy)];
        if config.fenced_json {
            strategies.push(Arc::new(FencedJsonStrategy));
        }
        strategies.push(Arc::new(HeuristicStrategy::new(config.max_input_bytes)));
        Self { strategies }
    }

    /// Append a strategy after the built-in ones.
    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Names of the configured strategies, in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Parse a reply. `requested` only matters when the reply has no outputs
    /// section and its text is duplicated to every requested platform.
    pub fn parse(&self, raw: &str, requested: &[Platform]) -> ParsedContent {
        self.parse_with_report(raw, requested).content
    }

    pub fn parse_with_report(&self, raw: &str, requested: &[Platform]) -> ParseOutcome {
        let mut report = ExtractionReport::default();

        for strategy in &self.strategies {
            // Coverage fields belong to the winning strategy only.
            let mut attempt = ExtractionReport::default();
            match strategy.extract(raw, requested, &mut attempt) {
                Ok(content) => {
                    attempt.strategy = Some(strategy.name());
                    attempt.attempts = std::mem::take(&mut report.attempts);
                    info!(
                        strategy = strategy.name(),
                        plan_fields = attempt.plan_fields_found,
                        platforms = attempt.platforms_found.len(),
                        duplicated = attempt.duplicated,
                        quality = %attempt.quality(),
                        "agent reply parsed"
                    );
                    return ParseOutcome {
                        content,
                        report: attempt,
                    };
                }
                Err(e) => {
                    debug!(strategy = strategy.name(), error = %e, "extraction strategy failed");
                    report.record_failure(strategy.name(), &e);
                }
            }
        }

        let reason = report
            .attempts
            .last()
            .map(|f| f.reason.clone())
            .unwrap_or_else(|| "no extraction strategy configured".to_string());
        warn!(
            attempts = report.attempts.len(),
            reason = %reason,
            "all extraction strategies failed, using fallback record"
        );
        let content = fallback(raw, &reason);
        report.fallback_reason = Some(reason);
        ParseOutcome { content, report }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl std::fmt::Debug for ResponseParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseParser")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

/// Parse with the default configuration.
pub fn parse_response(raw: &str, requested: &[Platform]) -> ParsedContent {
    ResponseParser::default().parse(raw, requested)
}
