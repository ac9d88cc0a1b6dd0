//! Pattern catalog: every heading/label matcher and placeholder the
//! extractors rely on.
//!
//! Nothing in here makes decisions. The plan and output extractors combine
//! these matchers; keeping the vocabulary in one place means a drift in the
//! agent's wording is a one-file change.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ContentPlan, Platform};

/// Placeholder values for the five plan fields.
#[derive(Debug, Clone, Copy)]
pub struct PlanDefaults {
    pub hook: &'static str,
    pub narrative_frame: &'static str,
    pub key_points: &'static [&'static str],
    pub example: &'static str,
    pub call_to_action: &'static str,
}

impl PlanDefaults {
    /// A plan made entirely of these placeholders.
    pub fn to_plan(&self) -> ContentPlan {
        ContentPlan {
            hook: self.hook.to_string(),
            narrative_frame: self.narrative_frame.to_string(),
            key_points: self.key_points.iter().map(|p| p.to_string()).collect(),
            example: self.example.to_string(),
            call_to_action: self.call_to_action.to_string(),
            extra: Default::default(),
        }
    }
}

/// Substituted field by field when the heuristic extractor misses a label.
pub const PLAN_DEFAULTS: PlanDefaults = PlanDefaults {
    hook: "Generated content available below",
    narrative_frame: "Structured content framework provided",
    key_points: &["Full detailed content available in the Notes section below"],
    example: "Detailed examples provided in the full content below",
    call_to_action: "Review and utilize the generated content",
};

/// Used as a whole when every extraction strategy failed.
pub const FALLBACK_PLAN: PlanDefaults = PlanDefaults {
    hook: "Content generated successfully",
    narrative_frame: "See full content below",
    key_points: &["Review the complete content in the notes section"],
    example: "Full details available below",
    call_to_action: "Review and use the generated content",
};

/// Start of a heading line: `#`..`######` (optionally bold) or a bold-only line.
const HEADING_PREFIX: &str = r"^[ \t]*(?:#{1,6}[ \t]*(?:\*\*)?|\*\*)[ \t]*";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

fn heading(marker: &str) -> Regex {
    compile(&format!(r"(?im){HEADING_PREFIX}{marker}"))
}

/// A label followed by its text block.
///
/// Matches `**Label:**`, `**Label**:` anywhere, or `Label:` at the start of a
/// line. Group 1 is the text after the label up to the next blank line, the
/// next `**`, a horizontal rule, or the end of the input.
fn label_block(label: &str) -> Regex {
    compile(&format!(
        r"(?ims)(?:\*\*[ \t]*(?:{label})[ \t]*:?[ \t]*\*\*[ \t]*:?|^[ \t]*(?:{label})[ \t]*:)\s*(.+?)(?:\r?\n[ \t]*\r?\n|\*\*|\r?\n[ \t]*-{{3,}}|\z)"
    ))
}

/// `## A) Plan` / `## A) Content Plan`, the whole heading line.
pub static PLAN_HEADING: Lazy<Regex> =
    Lazy::new(|| heading(r"A\)[ \t]*(?:content[ \t]+)?plan\b[^\n]*$"));

/// Any `B) ...` heading; closes the plan section.
pub static SECTION_B_HEADING: Lazy<Regex> = Lazy::new(|| heading(r"B\)"));

/// `## B) Outputs` / `## B) Platform Outputs`, the whole heading line.
pub static OUTPUTS_HEADING: Lazy<Regex> =
    Lazy::new(|| heading(r"B\)[ \t]*(?:platform[ \t]+)?outputs\b[^\n]*$"));

/// Any `C) ...` heading; closes the outputs section.
pub static SECTION_C_HEADING: Lazy<Regex> = Lazy::new(|| heading(r"C\)"));

pub static HOOK_LABEL: Lazy<Regex> = Lazy::new(|| label_block("hook"));

pub static NARRATIVE_LABEL: Lazy<Regex> = Lazy::new(|| label_block(r"narrative[ \t]*frame"));

pub static EXAMPLE_LABEL: Lazy<Regex> = Lazy::new(|| label_block("example"));

/// Plan-level and platform-level call to action.
pub static CTA_LABEL: Lazy<Regex> =
    Lazy::new(|| label_block(r"cta|call[ \t-]*to[ \t-]*action"));

pub static HASHTAGS_LABEL: Lazy<Regex> = Lazy::new(|| label_block("hashtags?"));

/// The `Key Points` label alone; the list after it is cut with [`LIST_END`].
pub static KEY_POINTS_LABEL: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?im)\*\*[ \t]*key[ \t]*points?[ \t]*:?[ \t]*\*\*[ \t]*:?|^[ \t]*key[ \t]*points?[ \t]*:",
    )
});

/// First line after a list that no longer belongs to it: a bold label, a
/// heading, or a horizontal rule.
pub static LIST_END: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^[ \t]*(?:\*\*|#{1,6}(?:[ \t]|\*|\r?$)|-{3,}[ \t\r]*$)")
});

/// A bulleted line; group 1 is the item text.
pub static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^[ \t]*[-•*][ \t]+(.+?)[ \t\r]*$"));

/// A markdown heading line; group 1 is the run of `#` (its depth).
///
/// Requires whitespace or bold after the hashes so `#AI` stays a hashtag.
pub static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^[ \t]*(#{1,6})(?:[ \t]|\*|\r?$)"));

pub static HASHTAG: Lazy<Regex> = Lazy::new(|| compile(r"#\w+"));

/// How a platform is named in a sub-heading, followed by the rest of the
/// heading text. `rest` matches whatever may trail the name (`[^\n]*` for a
/// markdown heading, `[^\n*]*` inside a bold-only heading).
///
/// A bare `X` only names Twitter when nothing but `/`, `(`, a post/thread
/// suffix or the end of the heading follows it, so `#### X marks the spot`
/// stays an ordinary sub-heading.
fn platform_name(platform: Platform, rest: &str) -> String {
    match platform {
        Platform::Linkedin => format!(r"linked[ \t-]?in\b{rest}"),
        Platform::Twitter => format!(
            r"twitter\b{rest}|x[ \t]*[/(]{rest}|x[ \t]+(?:post|thread|tweets?)\b{rest}|x[ \t:]*(?:\*\*[ \t:]*)?"
        ),
        Platform::Github => format!(r"git[ \t-]?hub\b{rest}"),
        Platform::Blog => format!(r"blog\b{rest}"),
    }
}

/// Sub-heading naming `platform`, tolerant of depth, bold, numbering and
/// trailing words (`### LinkedIn Post`, `#### **LinkedIn**`, `**2) Blog**`).
///
/// The `#` run must be followed by whitespace or bold so a hashtag such as
/// `#GitHub` is never read as a heading. Named group `hashes` holds the
/// heading's `#` run; it is absent for bold-only headings.
fn platform_heading(platform: Platform) -> Regex {
    let in_heading = platform_name(platform, r"[^\n]*");
    let in_bold = platform_name(platform, r"[^\n*]*");
    compile(&format!(
        r"(?im)^[ \t]*(?:(?P<hashes>#{{1,6}})(?:[ \t]+(?:\*\*)?|\*\*)[ \t]*(?:\d+[.)][ \t]*)?(?:{in_heading})|\*\*[ \t]*(?:\d+[.)][ \t]*)?(?:{in_bold})\*\*[ \t:]*)\r?$"
    ))
}

/// Indexed by `Platform as usize`, which follows [`Platform::ALL`].
static PLATFORM_HEADINGS: Lazy<[Regex; 4]> = Lazy::new(|| Platform::ALL.map(platform_heading));

/// The compiled sub-heading matcher for `platform`.
pub fn platform_heading_regex(platform: Platform) -> &'static Regex {
    &PLATFORM_HEADINGS[platform as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        for re in [
            &*PLAN_HEADING,
            &*SECTION_B_HEADING,
            &*OUTPUTS_HEADING,
            &*SECTION_C_HEADING,
            &*HOOK_LABEL,
            &*NARRATIVE_LABEL,
            &*EXAMPLE_LABEL,
            &*CTA_LABEL,
            &*HASHTAGS_LABEL,
            &*KEY_POINTS_LABEL,
            &*LIST_END,
            &*BULLET_LINE,
            &*HEADING_LINE,
            &*HASHTAG,
        ] {
            assert!(!re.as_str().is_empty());
        }
        for p in Platform::ALL {
            assert!(!platform_heading_regex(p).as_str().is_empty());
        }
    }

    #[test]
    fn plan_heading_variants() {
        assert!(PLAN_HEADING.is_match("## A) Plan"));
        assert!(PLAN_HEADING.is_match("# a) content plan\n"));
        assert!(PLAN_HEADING.is_match("**A) PLAN**"));
        assert!(!PLAN_HEADING.is_match("## A) Planning notes"));
    }

    #[test]
    fn outputs_heading_variants() {
        assert!(OUTPUTS_HEADING.is_match("## B) Outputs"));
        assert!(OUTPUTS_HEADING.is_match("## B) PLATFORM OUTPUTS"));
        assert!(!OUTPUTS_HEADING.is_match("## B) Other"));
    }

    #[test]
    fn label_block_bold_and_plain() {
        let caps = HOOK_LABEL.captures("**Hook:**\nOpening line\n\nrest").unwrap();
        assert_eq!(caps[1].trim(), "Opening line");
        let caps = HOOK_LABEL.captures("Hook: inline text").unwrap();
        assert_eq!(caps[1].trim(), "inline text");
        let caps = CTA_LABEL.captures("**Call to Action:** Star the repo").unwrap();
        assert_eq!(caps[1].trim(), "Star the repo");
    }

    #[test]
    fn heading_line_skips_hashtags() {
        assert!(HEADING_LINE.is_match("### Section"));
        assert!(!HEADING_LINE.is_match("#AI #Tech"));
    }

    #[test]
    fn platform_heading_variants() {
        let re = platform_heading_regex(Platform::Linkedin);
        assert!(re.is_match("### LinkedIn Post"));
        assert!(re.is_match("#### **LinkedIn**"));
        assert!(re.is_match("**LinkedIn:**"));
        assert!(!re.is_match("### Why LinkedIn matters"));

        let re = platform_heading_regex(Platform::Twitter);
        assert!(re.is_match("### X/Twitter Thread"));
        assert!(re.is_match("### 2) Twitter"));
        assert!(!re.is_match("### Xamarin"));
    }

    #[test]
    fn hashtags_are_not_platform_headings() {
        assert!(!platform_heading_regex(Platform::Github).is_match("#GitHub #OpenSource"));
        assert!(!platform_heading_regex(Platform::Blog).is_match("#Blog"));
        assert!(!platform_heading_regex(Platform::Linkedin).is_match("  #LinkedIn"));
        assert!(platform_heading_regex(Platform::Github).is_match("##**GitHub**"));
    }

    #[test]
    fn bare_x_names_twitter_only_on_its_own() {
        let re = platform_heading_regex(Platform::Twitter);
        assert!(re.is_match("### X"));
        assert!(re.is_match("### **X**"));
        assert!(re.is_match("**X:**"));
        assert!(re.is_match("### X (Twitter)"));
        assert!(re.is_match("### X Thread"));
        assert!(!re.is_match("#### X marks the spot"));
        assert!(!re.is_match("**X factor**"));
    }

    #[test]
    fn defaults_are_non_empty() {
        for d in [PLAN_DEFAULTS, FALLBACK_PLAN] {
            let plan = d.to_plan();
            assert!(!plan.hook.is_empty());
            assert!(!plan.narrative_frame.is_empty());
            assert!(!plan.key_points.is_empty());
            assert!(!plan.example.is_empty());
            assert!(!plan.call_to_action.is_empty());
        }
    }
}
