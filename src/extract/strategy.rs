//! Extraction strategies.
//!
//! A strategy turns a raw agent reply into a [`ParsedContent`] or explains
//! why it cannot. [`ResponseParser`](crate::ResponseParser) holds an ordered
//! list of them and the first success wins:
//!
//! | Strategy | Accepts |
//! |----------|---------|
//! | [`JsonStrategy`] | the whole reply is a JSON object |
//! | [`FencedJsonStrategy`] | a ```` ```json ```` block carrying `plan` or `outputs` |
//! | [`HeuristicStrategy`] | any non-empty markdown/prose reply |

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::diagnostics::ExtractionReport;
use crate::extract::error::{truncate, ExtractError};
use crate::extract::markup::{extract_code_block_for, strip_think_tags};
use crate::extract::outputs::extract_outputs;
use crate::extract::plan::extract_plan;
use crate::types::{ContentPlan, ParsedContent, Platform, PlatformOutput};

/// Characters of the reply quoted in a [`ExtractError::NotStructured`].
const QUOTE_CHARS: usize = 200;

/// One way of turning raw agent text into a [`ParsedContent`].
///
/// Implementations must be deterministic and must not panic. `requested` is
/// the list of platforms the caller asked for; `report` may be enriched with
/// coverage details when the strategy succeeds.
pub trait ExtractionStrategy: Send + Sync {
    /// Short stable identifier recorded in the [`ExtractionReport`].
    fn name(&self) -> &'static str;

    fn extract(
        &self,
        raw: &str,
        requested: &[Platform],
        report: &mut ExtractionReport,
    ) -> Result<ParsedContent, ExtractError>;
}

/// Shape of a structured reply.
///
/// Known keys are held as raw JSON and decoded leniently: a null or mistyped
/// field takes its default rather than failing the whole reply.
#[derive(Debug, Deserialize)]
struct ReplyDocument {
    #[serde(default)]
    plan: Value,
    #[serde(default)]
    outputs: Value,
    #[serde(default)]
    notes: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ReplyDocument {
    fn into_parsed(self, raw: &str) -> Result<ParsedContent, ExtractError> {
        let plan = match self.plan {
            plan @ Value::Object(_) => serde_json::from_value(plan)?,
            _ => ContentPlan::default(),
        };

        let mut outputs = BTreeMap::new();
        if let Value::Object(entries) = self.outputs {
            for (key, entry) in entries {
                let output = match entry {
                    entry @ Value::Object(_) => serde_json::from_value::<PlatformOutput>(entry)?,
                    Value::String(content) => PlatformOutput {
                        content,
                        ..Default::default()
                    },
                    // null and other scalars mean "no content for this platform"
                    _ => continue,
                };
                outputs.insert(key.parse::<Platform>()?, output);
            }
        }

        let notes = match self.notes {
            Value::String(notes) => notes,
            _ => raw.to_string(),
        };

        Ok(ParsedContent {
            plan,
            outputs,
            notes,
            extra: self.extra,
        })
    }
}

fn record_outputs(report: &mut ExtractionReport, content: &ParsedContent) {
    report.platforms_found = content.outputs.keys().copied().collect();
}

/// Decode the entire reply as a JSON object and trust it completely.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStrategy;

impl JsonStrategy {
    pub const NAME: &'static str = "json";
}

impl ExtractionStrategy for JsonStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(
        &self,
        raw: &str,
        _requested: &[Platform],
        report: &mut ExtractionReport,
    ) -> Result<ParsedContent, ExtractError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ExtractError::EmptyResponse);
        }

        let value: Value = serde_json::from_str(trimmed)?;
        if !value.is_object() {
            return Err(ExtractError::NotStructured {
                expected: "JSON object",
                text: truncate(trimmed, QUOTE_CHARS),
            });
        }

        let doc: ReplyDocument = serde_json::from_value(value)?;
        let content = doc.into_parsed(raw)?;
        record_outputs(report, &content);
        Ok(content)
    }
}

/// Decode the first ```` ```json ```` block when it looks like a content pack.
///
/// Agents often wrap a structured answer in prose ("Here is your content
/// pack:"); the block must carry a `plan` or `outputs` key so an unrelated
/// JSON snippet inside a blog post is never mistaken for the whole reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedJsonStrategy;

impl FencedJsonStrategy {
    pub const NAME: &'static str = "fenced_json";
}

impl ExtractionStrategy for FencedJsonStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(
        &self,
        raw: &str,
        _requested: &[Platform],
        report: &mut ExtractionReport,
    ) -> Result<ParsedContent, ExtractError> {
        if raw.trim().is_empty() {
            return Err(ExtractError::EmptyResponse);
        }

        let text = strip_think_tags(raw);
        let not_structured = || ExtractError::NotStructured {
            expected: "fenced JSON content pack",
            text: truncate(raw.trim(), QUOTE_CHARS),
        };

        let block = extract_code_block_for(&text, "json").ok_or_else(not_structured)?;
        let value: Value = serde_json::from_str(block)?;
        let is_pack = value
            .as_object()
            .map(|obj| obj.contains_key("plan") || obj.contains_key("outputs"))
            .unwrap_or(false);
        if !is_pack {
            return Err(not_structured());
        }

        let doc: ReplyDocument = serde_json::from_value(value)?;
        let content = doc.into_parsed(raw)?;
        record_outputs(report, &content);
        Ok(content)
    }
}

/// Label and heading extraction over markdown or prose.
///
/// Succeeds on any non-empty reply within the size limit: missing plan
/// fields take their placeholders and a missing outputs section triggers
/// the duplication fallback.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicStrategy {
    max_input_bytes: usize,
}

impl HeuristicStrategy {
    pub const NAME: &'static str = "heuristic";

    pub fn new(max_input_bytes: usize) -> Self {
        Self { max_input_bytes }
    }
}

impl Default for HeuristicStrategy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_INPUT_BYTES)
    }
}

impl ExtractionStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(
        &self,
        raw: &str,
        requested: &[Platform],
        report: &mut ExtractionReport,
    ) -> Result<ParsedContent, ExtractError> {
        if raw.len() > self.max_input_bytes {
            return Err(ExtractError::InputTooLarge {
                len: raw.len(),
                max: self.max_input_bytes,
            });
        }

        let text = strip_think_tags(raw);
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyResponse);
        }

        let plan = extract_plan(&text);
        let outputs = extract_outputs(&text, raw, requested, &plan.plan.call_to_action);

        report.plan_section_found = plan.section_found;
        report.plan_fields_found = plan.fields_found;
        report.outputs_section_found = outputs.section_found;
        report.duplicated = outputs.duplicated;

        let content = ParsedContent {
            plan: plan.plan,
            outputs: outputs.outputs,
            notes: raw.to_string(),
            extra: Map::new(),
        };
        record_outputs(report, &content);
        Ok(content)
    }
}
