use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::diagnostics::ExtractionReport;
use crate::extract::patterns::PLAN_DEFAULTS;

/// Maximum characters of the hook shown as a history summary.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Summary used when a record has no usable hook.
pub const SUMMARY_PLACEHOLDER: &str = "Content generated";

/// A supported publishing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
    Github,
    Blog,
}

impl Platform {
    /// Every supported platform, in extraction order.
    pub const ALL: [Platform; 4] = [
        Platform::Linkedin,
        Platform::Twitter,
        Platform::Github,
        Platform::Blog,
    ];

    /// Stable lowercase identifier (`"linkedin"`, `"twitter"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Github => "github",
            Platform::Blog => "blog",
        }
    }

    /// Human-facing name used in exported documents.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "Twitter",
            Platform::Github => "GitHub",
            Platform::Blog => "Blog",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform identifier outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported platform: {0}")]
pub struct UnsupportedPlatform(pub String);

impl FromStr for Platform {
    type Err = UnsupportedPlatform;

    /// Case-insensitive; `x` is accepted for Twitter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" | "x" => Ok(Platform::Twitter),
            "github" => Ok(Platform::Github),
            "blog" => Ok(Platform::Blog),
            _ => Err(UnsupportedPlatform(s.to_string())),
        }
    }
}

/// Narrative framing for a content pack.
///
/// Every field always holds a value; when nothing was extracted it holds the
/// placeholder from [`PLAN_DEFAULTS`]. Decoding is lenient: a field that is
/// null or of the wrong JSON type takes its placeholder instead of failing
/// the whole plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPlan")]
pub struct ContentPlan {
    pub hook: String,
    pub narrative_frame: String,
    pub key_points: Vec<String>,
    pub example: String,
    pub call_to_action: String,
    /// Keys a structured reply carried beyond the known fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ContentPlan {
    fn default() -> Self {
        PLAN_DEFAULTS.to_plan()
    }
}

/// Wire shape of a plan: every known field is taken as raw JSON.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlan {
    #[serde(default)]
    hook: Value,
    #[serde(default, alias = "narrative_frame")]
    narrative_frame: Value,
    #[serde(default, alias = "key_points")]
    key_points: Value,
    #[serde(default)]
    example: Value,
    #[serde(default, alias = "cta", alias = "call_to_action")]
    call_to_action: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawPlan> for ContentPlan {
    fn from(raw: RawPlan) -> Self {
        let or_default = |value: Value, default: &str| {
            json_text(value).unwrap_or_else(|| default.to_string())
        };
        Self {
            hook: or_default(raw.hook, PLAN_DEFAULTS.hook),
            narrative_frame: or_default(raw.narrative_frame, PLAN_DEFAULTS.narrative_frame),
            key_points: json_list(raw.key_points, split_lines).unwrap_or_else(|| {
                PLAN_DEFAULTS.key_points.iter().map(|p| p.to_string()).collect()
            }),
            example: or_default(raw.example, PLAN_DEFAULTS.example),
            call_to_action: or_default(raw.call_to_action, PLAN_DEFAULTS.call_to_action),
            extra: raw.extra,
        }
    }
}

/// Rendered content for a single platform.
///
/// Decoded as leniently as [`ContentPlan`]: null or mistyped fields are
/// empty, and `hashtags` may also arrive as one space-separated string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawOutput")]
pub struct PlatformOutput {
    pub content: String,
    pub hashtags: Vec<String>,
    pub call_to_action: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutput {
    #[serde(default)]
    content: Value,
    #[serde(default)]
    hashtags: Value,
    #[serde(default, alias = "cta", alias = "call_to_action")]
    call_to_action: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawOutput> for PlatformOutput {
    fn from(raw: RawOutput) -> Self {
        Self {
            content: json_text(raw.content).unwrap_or_default(),
            hashtags: json_list(raw.hashtags, split_tags).unwrap_or_default(),
            call_to_action: json_text(raw.call_to_action).unwrap_or_default(),
            extra: raw.extra,
        }
    }
}

/// Strings as-is, numbers and booleans rendered; anything else is absent.
fn json_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// An array of scalars, or a single string broken up by `split`.
fn json_list(value: Value, split: fn(&str) -> Vec<String>) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.into_iter().filter_map(json_text).collect()),
        Value::String(s) => Some(split(&s)),
        _ => None,
    }
}

fn split_lines(s: &str) -> Vec<String> {
    s.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_tags(s: &str) -> Vec<String> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// The structured record produced from one agent reply.
///
/// Immutable snapshot: built once by [`ResponseParser`](crate::ResponseParser)
/// and then only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedContent {
    pub plan: ContentPlan,
    pub outputs: BTreeMap<Platform, PlatformOutput>,
    /// The full original reply, verbatim.
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParsedContent {
    /// Output for `platform`, if the reply covered it.
    pub fn output(&self, platform: Platform) -> Option<&PlatformOutput> {
        self.outputs.get(&platform)
    }

    /// The hook truncated for list views.
    pub fn summary(&self) -> String {
        if self.plan.hook.trim().is_empty() {
            return SUMMARY_PLACEHOLDER.to_string();
        }
        self.plan.hook.chars().take(SUMMARY_MAX_CHARS).collect()
    }
}

/// A content generation request as received from a caller.
///
/// Platforms are raw identifiers; the content scanner turns them into
/// [`Platform`] values or rejects the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: String,
    pub platforms: Vec<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub additional_context: Option<String>,
    pub user_id: String,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            platforms: Vec::new(),
            audience: None,
            additional_context: None,
            user_id: user_id.into(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platforms.push(platform.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }
}

/// Bookkeeping attached to every generated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub generated_at: DateTime<Utc>,
    /// Wall-clock seconds spent waiting for the agent.
    pub duration_secs: f64,
    pub user_id: String,
    pub agent_version: String,
}

/// A generated content pack, ready to be stored or exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: Uuid,
    pub topic: String,
    pub platforms: Vec<Platform>,
    pub content: ParsedContent,
    pub metadata: GenerationMetadata,
    /// How the reply was parsed. Not persisted.
    #[serde(skip)]
    pub report: ExtractionReport,
}

/// One row of a user's generation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub topic: String,
    pub platforms: Vec<Platform>,
    pub generated_at: DateTime<Utc>,
    pub user_id: String,
    pub summary: String,
}

impl From<&ContentRecord> for HistoryItem {
    fn from(record: &ContentRecord) -> Self {
        Self {
            id: record.id,
            topic: record.topic.clone(),
            platforms: record.platforms.clone(),
            generated_at: record.metadata.generated_at,
            user_id: record.metadata.user_id.clone(),
            summary: record.content.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content_with_hook(hook: &str) -> ParsedContent {
        ParsedContent {
            plan: ContentPlan {
                hook: hook.to_string(),
                ..Default::default()
            },
            outputs: BTreeMap::new(),
            notes: String::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_platform_from_str_is_case_insensitive() {
        assert_eq!("LinkedIn".parse::<Platform>(), Ok(Platform::Linkedin));
        assert_eq!(" GITHUB ".parse::<Platform>(), Ok(Platform::Github));
        assert_eq!("x".parse::<Platform>(), Ok(Platform::Twitter));
    }

    #[test]
    fn test_platform_from_str_rejects_unknown() {
        let err = "video".parse::<Platform>().unwrap_err();
        assert_eq!(err, UnsupportedPlatform("video".to_string()));
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Platform::Github).unwrap(), json!("github"));
        assert_eq!(Platform::Twitter.to_string(), "twitter");
    }

    #[test]
    fn test_plan_accepts_snake_case_aliases() {
        let plan: ContentPlan = serde_json::from_value(json!({
            "hook": "h",
            "narrative_frame": "n",
            "key_points": ["a", "b"],
            "example": "e",
            "cta": "c"
        }))
        .unwrap();
        assert_eq!(plan.narrative_frame, "n");
        assert_eq!(plan.key_points, vec!["a", "b"]);
        assert_eq!(plan.call_to_action, "c");
        assert!(plan.extra.is_empty());
    }

    #[test]
    fn test_plan_missing_fields_take_defaults() {
        let plan: ContentPlan = serde_json::from_value(json!({"hook": "only"})).unwrap();
        assert_eq!(plan.hook, "only");
        assert_eq!(plan.example, PLAN_DEFAULTS.example);
    }

    #[test]
    fn test_plan_keeps_unknown_keys() {
        let plan: ContentPlan =
            serde_json::from_value(json!({"hook": "h", "title": "T"})).unwrap();
        assert_eq!(plan.extra.get("title"), Some(&json!("T")));
        let back = serde_json::to_value(&plan).unwrap();
        assert_eq!(back["title"], "T");
        assert_eq!(back["narrativeFrame"], PLAN_DEFAULTS.narrative_frame);
    }

    #[test]
    fn test_plan_null_and_mistyped_fields_take_defaults() {
        let plan: ContentPlan = serde_json::from_value(json!({
            "hook": "H",
            "narrativeFrame": null,
            "keyPoints": null,
            "example": {"nested": true},
            "callToAction": 42
        }))
        .unwrap();
        assert_eq!(plan.hook, "H");
        assert_eq!(plan.narrative_frame, PLAN_DEFAULTS.narrative_frame);
        assert_eq!(plan.key_points, PLAN_DEFAULTS.to_plan().key_points);
        assert_eq!(plan.example, PLAN_DEFAULTS.example);
        assert_eq!(plan.call_to_action, "42");
    }

    #[test]
    fn test_plan_key_points_as_string() {
        let plan: ContentPlan =
            serde_json::from_value(json!({"keyPoints": "- one\n- two\n"})).unwrap();
        assert_eq!(plan.key_points, vec!["one", "two"]);
    }

    #[test]
    fn test_output_lenient_fields() {
        let output: PlatformOutput = serde_json::from_value(json!({
            "content": null,
            "hashtags": "#AI #Tech, #Rust",
            "cta": ["not", "text"],
            "tweets": [{"order": 1}]
        }))
        .unwrap();
        assert_eq!(output.content, "");
        assert_eq!(output.hashtags, vec!["#AI", "#Tech", "#Rust"]);
        assert_eq!(output.call_to_action, "");
        assert_eq!(output.extra["tweets"][0]["order"], 1);
    }

    #[test]
    fn test_output_round_trips() {
        let output = PlatformOutput {
            content: "post".to_string(),
            hashtags: vec!["#AI".to_string()],
            call_to_action: "go".to_string(),
            extra: Map::new(),
        };
        let back: PlatformOutput =
            serde_json::from_value(serde_json::to_value(&output).unwrap()).unwrap();
        assert_eq!(back, output);
    }

    #[test]
    fn test_summary_truncates_to_200_chars() {
        let hook = "é".repeat(250);
        let summary = content_with_hook(&hook).summary();
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(hook.starts_with(&summary));
    }

    #[test]
    fn test_summary_placeholder_for_empty_hook() {
        assert_eq!(content_with_hook("  ").summary(), SUMMARY_PLACEHOLDER);
        assert_eq!(content_with_hook("Short hook").summary(), "Short hook");
    }

    #[test]
    fn test_generation_request_builder() {
        let req = GenerationRequest::new("Rust async", "user-1")
            .with_platform("linkedin")
            .with_platform("blog")
            .with_audience("engineers");
        assert_eq!(req.platforms, vec!["linkedin", "blog"]);
        assert_eq!(req.audience.as_deref(), Some("engineers"));
        assert!(req.additional_context.is_none());
    }
}
