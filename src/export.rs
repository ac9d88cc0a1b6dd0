//! Export of generated records as Markdown or JSON documents.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::json;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{ContentRecord, Platform, PlatformOutput, UnsupportedPlatform};

/// Document format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported export format: {0}")]
pub struct UnsupportedFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            _ => Err(UnsupportedFormat(s.to_string())),
        }
    }
}

/// Which platform outputs an export includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    pub fn includes(self, platform: Platform) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Only(p) => p == platform,
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFilter::All => f.write_str("all"),
            PlatformFilter::Only(p) => write!(f, "{p}"),
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = UnsupportedPlatform;

    /// `all` (any case) or a platform identifier.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(PlatformFilter::All)
        } else {
            s.parse().map(PlatformFilter::Only)
        }
    }
}

/// Download name for an export: `storycircuit-{first 8 of id}[-{platform}].{ext}`.
///
/// ```
/// use storycircuit::export::{filename, ExportFormat, PlatformFilter};
/// use storycircuit::Platform;
/// use uuid::Uuid;
///
/// let id = Uuid::parse_str("0f8fad5b-d9cb-469f-a165-70867728950e").unwrap();
/// assert_eq!(filename(&id, ExportFormat::Markdown, PlatformFilter::All), "storycircuit-0f8fad5b.md");
/// assert_eq!(
///     filename(&id, ExportFormat::Json, PlatformFilter::Only(Platform::Github)),
///     "storycircuit-0f8fad5b-github.json"
/// );
/// ```
pub fn filename(id: &Uuid, format: ExportFormat, filter: PlatformFilter) -> String {
    let id = id.to_string();
    let short: String = id.chars().take(8).collect();
    let suffix = match filter {
        PlatformFilter::All => String::new(),
        PlatformFilter::Only(p) => format!("-{p}"),
    };
    format!("storycircuit-{short}{suffix}.{}", format.extension())
}

/// Render `record` in `format`.
pub fn export(record: &ContentRecord, format: ExportFormat, filter: PlatformFilter) -> Result<String> {
    info!(id = %record.id, format = %format, platform = %filter, "exporting content");
    match format {
        ExportFormat::Markdown => Ok(to_markdown(record, filter)),
        ExportFormat::Json => to_json(record, filter),
    }
}

fn format_output(output: &PlatformOutput) -> String {
    let mut lines = Vec::new();

    // Structured replies may carry platform payloads (tweets, carousel
    // slides) outside `content`.
    let structured = if output.content.trim().is_empty() && !output.extra.is_empty() {
        serde_json::to_string_pretty(&output.extra).ok()
    } else {
        None
    };
    match structured {
        Some(pretty) => {
            lines.push("```json".to_string());
            lines.push(pretty);
            lines.push("```".to_string());
        }
        None => lines.push(output.content.clone()),
    }

    if !output.hashtags.is_empty() {
        lines.push(String::new());
        lines.push(format!("**Hashtags:** {}", output.hashtags.join(" ")));
    }
    if !output.call_to_action.trim().is_empty() {
        lines.push(String::new());
        lines.push(format!("**CTA:** {}", output.call_to_action));
    }

    lines.join("\n")
}

/// Platforms whose section is rendered, in the order they are rendered.
fn exported_platforms(record: &ContentRecord, filter: PlatformFilter) -> Vec<Platform> {
    match filter {
        PlatformFilter::All => record.platforms.clone(),
        PlatformFilter::Only(p) => vec![p],
    }
}

/// Render a record as a Markdown document.
///
/// Only platforms present in the record's outputs get a section.
pub fn to_markdown(record: &ContentRecord, filter: PlatformFilter) -> String {
    let content = &record.content;
    let plan = &content.plan;

    let mut lines = vec![
        format!("# {}\n", record.topic),
        "## Content Plan\n".to_string(),
        format!("**Hook:** {}\n", plan.hook),
        format!("**Narrative Frame:** {}\n", plan.narrative_frame),
        "**Key Points:**".to_string(),
    ];
    lines.extend(plan.key_points.iter().map(|p| format!("- {p}")));
    lines.push(String::new());
    lines.push(format!("**Example:** {}\n", plan.example));
    lines.push(format!("**CTA:** {}\n", plan.call_to_action));

    for platform in exported_platforms(record, filter) {
        let Some(output) = content.output(platform) else {
            continue;
        };
        lines.push(format!("## {} Output\n", platform.display_name()));
        lines.push(format_output(output));
        lines.push(String::new());
    }

    lines.push("## Notes\n".to_string());
    lines.push(content.notes.clone());
    lines.push(String::new());

    lines.join("\n")
}

/// Render a record as a pretty-printed JSON document.
///
/// Filtering to a platform the record has no output for keeps every output.
pub fn to_json(record: &ContentRecord, filter: PlatformFilter) -> Result<String> {
    let content = &record.content;

    let outputs: BTreeMap<&Platform, &PlatformOutput> = match filter {
        PlatformFilter::Only(p) if content.outputs.contains_key(&p) => content
            .outputs
            .iter()
            .filter(|(platform, _)| filter.includes(**platform))
            .collect(),
        _ => content.outputs.iter().collect(),
    };

    let document = json!({
        "id": record.id,
        "topic": record.topic,
        "platforms": exported_platforms(record, filter),
        "content": {
            "plan": content.plan,
            "outputs": outputs,
            "notes": content.notes,
        },
        "metadata": record.metadata,
    });

    Ok(serde_json::to_string_pretty(&document)?)
}
