//! Agent prompt construction.

use crate::types::Platform;

/// What the agent is asked to write about. Free-text fields are expected to
/// be validated and sanitized already.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub topic: &'a str,
    pub platforms: &'a [Platform],
    pub audience: Option<&'a str>,
    pub additional_context: Option<&'a str>,
}

/// Comma-separated platform identifiers, in request order.
pub fn platform_list(platforms: &[Platform]) -> String {
    platforms
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the prompt sent to the agent.
///
/// Blank optional fields are left out.
///
/// # Example
///
/// ```
/// use storycircuit::prompt::{build_prompt, PromptInput};
/// use storycircuit::Platform;
///
/// let prompt = build_prompt(&PromptInput {
///     topic: "Rust error handling",
///     platforms: &[Platform::Linkedin, Platform::Blog],
///     audience: Some("backend engineers"),
///     additional_context: None,
/// });
/// assert!(prompt.starts_with("Generate technical content about: Rust error handling\n"));
/// assert!(prompt.contains("Target platforms: linkedin, blog"));
/// assert!(!prompt.contains("Additional context"));
/// ```
pub fn build_prompt(input: &PromptInput<'_>) -> String {
    let platforms = platform_list(input.platforms);

    let mut parts = vec![
        format!("Generate technical content about: {}", input.topic.trim()),
        format!("Target platforms: {platforms}"),
    ];

    if let Some(audience) = non_blank(input.audience) {
        parts.push(format!("Target audience: {audience}"));
    }
    if let Some(context) = non_blank(input.additional_context) {
        parts.push(format!("Additional context: {context}"));
    }

    parts.push(format!(
        "\nIMPORTANT: You MUST generate SEPARATE, DISTINCT content for EACH platform: {platforms}."
    ));
    parts.push(
        "Each platform requires different formatting and length (see agent-instructions.md)."
            .to_string(),
    );
    parts.push(
        "\nPlease provide a complete Content Pack with plan, platform outputs for ALL requested platforms, and notes."
            .to_string(),
    );

    parts.join("\n")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
