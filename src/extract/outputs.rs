//! Platform output extraction: body, hashtags and call to action for each
//! platform covered by the reply's outputs section.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::extract::markup::trim_rules;
use crate::extract::patterns::{
    platform_heading_regex, CTA_LABEL, HASHTAG, HASHTAGS_LABEL, HEADING_LINE,
};
use crate::extract::plan::label_value;
use crate::extract::section::outputs_section;
use crate::types::{Platform, PlatformOutput};

/// Depth given to bold-only sub-headings: any markdown heading closes them.
const BOLD_HEADING_DEPTH: usize = 7;

/// Result of running the output extractors over a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputsExtraction {
    pub outputs: BTreeMap<Platform, PlatformOutput>,
    /// Whether a `B) Outputs` heading was found.
    pub section_found: bool,
    /// Whether the duplication fallback filled the map.
    pub duplicated: bool,
}

/// Locate the span belonging to `platform`: from the end of its sub-heading
/// to the next heading of the same or shallower depth, the next sub-heading
/// of another platform, or the end of the section.
fn platform_span(section: &str, platform: Platform) -> Option<&str> {
    let caps = platform_heading_regex(platform).captures(section)?;
    let heading = caps.get(0)?;
    let depth = caps
        .name("hashes")
        .map(|m| m.as_str().len())
        .unwrap_or(BOLD_HEADING_DEPTH);
    let start = heading.end();

    let mut end = section.len();

    for other in Platform::ALL.iter().filter(|&&p| p != platform) {
        if let Some(m) = platform_heading_regex(*other).find_at(section, start) {
            end = end.min(m.start());
        }
    }

    let closing_heading = HEADING_LINE
        .captures_iter(&section[start..])
        .find(|c| c.get(1).map(|h| h.as_str().len() <= depth).unwrap_or(false))
        .and_then(|c| c.get(0))
        .map(|m| start + m.start());
    if let Some(pos) = closing_heading {
        end = end.min(pos);
    }

    Some(&section[start..end])
}

/// Extract one platform's output from the outputs section.
///
/// `None` when the section has no sub-heading for `platform`.
pub fn extract_platform(
    section: &str,
    platform: Platform,
    plan_cta: &str,
) -> Option<PlatformOutput> {
    let span = platform_span(section, platform)?;

    let body_end = [HASHTAGS_LABEL.find(span), CTA_LABEL.find(span)]
        .into_iter()
        .flatten()
        .map(|m| m.start())
        .min()
        .unwrap_or(span.len());
    let content = trim_rules(&span[..body_end]).to_string();

    let hashtags = HASHTAGS_LABEL
        .captures(span)
        .and_then(|caps| caps.get(1))
        .map(|block| {
            HASHTAG
                .find_iter(block.as_str())
                .map(|m| m.as_str().to_string())
                .collect()
        })
        .unwrap_or_default();

    let call_to_action = label_value(&CTA_LABEL, span).unwrap_or_else(|| plan_cta.to_string());

    Some(PlatformOutput {
        content,
        hashtags,
        call_to_action,
        extra: Default::default(),
    })
}

/// Every requested platform gets the whole reply as its content.
pub fn duplicate_outputs(
    raw: &str,
    requested: &[Platform],
    plan_cta: &str,
) -> BTreeMap<Platform, PlatformOutput> {
    requested
        .iter()
        .map(|&platform| {
            (
                platform,
                PlatformOutput {
                    content: raw.to_string(),
                    hashtags: Vec::new(),
                    call_to_action: plan_cta.to_string(),
                    extra: Default::default(),
                },
            )
        })
        .collect()
}

/// Extract all platform outputs.
///
/// `text` is searched for the outputs section; `raw` is what the duplication
/// fallback copies when that section is missing.
pub fn extract_outputs(
    text: &str,
    raw: &str,
    requested: &[Platform],
    plan_cta: &str,
) -> OutputsExtraction {
    let Some(section) = outputs_section(text) else {
        warn!(
            requested = requested.len(),
            "outputs section not found, duplicating reply to requested platforms"
        );
        return OutputsExtraction {
            outputs: duplicate_outputs(raw, requested, plan_cta),
            section_found: false,
            duplicated: true,
        };
    };

    let mut outputs = BTreeMap::new();
    for platform in Platform::ALL {
        match extract_platform(section, platform, plan_cta) {
            Some(output) => {
                debug!(
                    platform = %platform,
                    content_length = output.content.len(),
                    hashtag_count = output.hashtags.len(),
                    "extracted platform output"
                );
                outputs.insert(platform, output);
            }
            None => {
                if requested.contains(&platform) {
                    warn!(platform = %platform, "no content found for requested platform");
                }
            }
        }
    }

    OutputsExtraction {
        outputs,
        section_found: true,
        duplicated: false,
    }
}
