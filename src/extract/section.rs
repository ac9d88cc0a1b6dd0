//! Segmentation of an agent reply into its plan and outputs sections.

use regex::Regex;

use crate::extract::patterns::{
    OUTPUTS_HEADING, PLAN_HEADING, SECTION_B_HEADING, SECTION_C_HEADING,
};

/// Text between the heading matched by `start` and the next heading matched by
/// `end` (or the end of `text`). The heading line itself is excluded.
fn section_between<'a>(text: &'a str, start: &Regex, end: &Regex) -> Option<&'a str> {
    let heading = start.find(text)?;
    let mut body_start = heading.end();
    let rest = &text[body_start..];
    if rest.starts_with("\r\n") {
        body_start += 2;
    } else if rest.starts_with('\n') {
        body_start += 1;
    }
    let body_end = end
        .find_at(text, body_start)
        .map(|m| m.start())
        .unwrap_or(text.len());
    Some(&text[body_start..body_end])
}

/// The `A) Plan` section, up to the next `B) ...` heading.
///
/// `None` when the reply has no plan heading.
pub fn plan_section(text: &str) -> Option<&str> {
    section_between(text, &PLAN_HEADING, &SECTION_B_HEADING)
}

/// The `B) Outputs` section, up to the next `C) ...` heading.
///
/// `None` when the reply has no outputs heading.
pub fn outputs_section(text: &str) -> Option<&str> {
    section_between(text, &OUTPUTS_HEADING, &SECTION_C_HEADING)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "\
Intro line
## A) Plan
**Hook:**
Plan body
## B) Platform Outputs
### LinkedIn
Post body
## C) Notes
Closing notes";

    #[test]
    fn plan_section_stops_at_b_heading() {
        assert_eq!(plan_section(REPLY), Some("**Hook:**\nPlan body\n"));
    }

    #[test]
    fn outputs_section_stops_at_c_heading() {
        assert_eq!(outputs_section(REPLY), Some("### LinkedIn\nPost body\n"));
    }

    #[test]
    fn section_runs_to_end_without_closing_heading() {
        let text = "## B) Outputs\n### Blog\nBody";
        assert_eq!(outputs_section(text), Some("### Blog\nBody"));
    }

    #[test]
    fn missing_heading_is_none() {
        assert_eq!(plan_section("no headings at all"), None);
        assert_eq!(outputs_section("## A) Plan\nonly a plan"), None);
    }

    #[test]
    fn heading_at_end_of_text_gives_empty_section() {
        assert_eq!(plan_section("## A) Plan"), Some(""));
    }

    #[test]
    fn crlf_line_endings() {
        let text = "## A) Plan\r\n**Hook:** hi\r\n## B) Outputs\r\n";
        assert_eq!(plan_section(text), Some("**Hook:** hi\r\n"));
    }
}
