//! Plan extraction: the five narrative fields of a content pack.
//!
//! Every field has its own extractor returning `Option`; the caller
//! substitutes [`PLAN_DEFAULTS`] per field, so one missing label never
//! affects another.

use regex::Regex;

use crate::extract::patterns::{
    BULLET_LINE, CTA_LABEL, EXAMPLE_LABEL, HOOK_LABEL, KEY_POINTS_LABEL, LIST_END,
    NARRATIVE_LABEL, PLAN_DEFAULTS,
};
use crate::extract::section::plan_section;
use crate::types::ContentPlan;

/// Result of running the plan extractors over a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanExtraction {
    /// The plan, with placeholders wherever a field was not found.
    pub plan: ContentPlan,
    /// Whether an `A) Plan` heading delimited the search.
    pub section_found: bool,
    /// How many of the five fields were extracted (0-5).
    pub fields_found: u8,
}

/// Text of the first non-empty block following a label matched by `re`.
///
/// A block that starts with `**` is the next label, not a value.
pub(crate) fn label_value(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text).find_map(|caps| {
        let value = caps.get(1)?.as_str().trim();
        if value.is_empty() || value.starts_with("**") {
            None
        } else {
            Some(value.to_string())
        }
    })
}

pub fn extract_hook(section: &str) -> Option<String> {
    label_value(&HOOK_LABEL, section)
}

pub fn extract_narrative_frame(section: &str) -> Option<String> {
    label_value(&NARRATIVE_LABEL, section)
}

pub fn extract_example(section: &str) -> Option<String> {
    label_value(&EXAMPLE_LABEL, section)
}

pub fn extract_call_to_action(section: &str) -> Option<String> {
    label_value(&CTA_LABEL, section)
}

/// Bulleted lines following the `Key Points` label, in document order.
///
/// The list ends at the next bold label, heading, or horizontal rule.
/// `None` when the label is missing or no bullet follows it.
pub fn extract_key_points(section: &str) -> Option<Vec<String>> {
    let label = KEY_POINTS_LABEL.find(section)?;
    let after = &section[label.end()..];
    // The label's own line never ends the list.
    let first_line_end = after.find('\n').map(|i| i + 1).unwrap_or(after.len());
    let list_end = LIST_END
        .find_at(after, first_line_end)
        .map(|m| m.start())
        .unwrap_or(after.len());

    let points: Vec<String> = BULLET_LINE
        .captures_iter(&after[..list_end])
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}

/// Extract the plan from a full reply.
///
/// Searches the `A) Plan` section when present, the whole text otherwise.
pub fn extract_plan(text: &str) -> PlanExtraction {
    let section = plan_section(text);
    let scope = section.unwrap_or(text);

    let hook = extract_hook(scope);
    let narrative_frame = extract_narrative_frame(scope);
    let key_points = extract_key_points(scope);
    let example = extract_example(scope);
    let call_to_action = extract_call_to_action(scope);

    let fields_found = [
        hook.is_some(),
        narrative_frame.is_some(),
        key_points.is_some(),
        example.is_some(),
        call_to_action.is_some(),
    ]
    .iter()
    .filter(|found| **found)
    .count() as u8;

    let plan = ContentPlan {
        hook: hook.unwrap_or_else(|| PLAN_DEFAULTS.hook.to_string()),
        narrative_frame: narrative_frame
            .unwrap_or_else(|| PLAN_DEFAULTS.narrative_frame.to_string()),
        key_points: key_points.unwrap_or_else(|| {
            PLAN_DEFAULTS.key_points.iter().map(|p| p.to_string()).collect()
        }),
        example: example.unwrap_or_else(|| PLAN_DEFAULTS.example.to_string()),
        call_to_action: call_to_action
            .unwrap_or_else(|| PLAN_DEFAULTS.call_to_action.to_string()),
        extra: Default::default(),
    };

    PlanExtraction {
        plan,
        section_found: section.is_some(),
        fields_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "\
## A) Plan

**Hook:**
Most teams get agent orchestration wrong.

**Narrative Frame:**
Problem -> Insight -> Action

**Key Points:**
- Sequential vs parallel execution
  - Error handling
• Observability from day one

**Example:**
A support bot that escalates to a human.

**CTA:**
Try building your first agent today.

---

## B) Platform Outputs
**Hook:** not part of the plan
";

    #[test]
    fn extracts_every_field() {
        let result = extract_plan(PLAN);
        assert!(result.section_found);
        assert_eq!(result.fields_found, 5);
        let plan = result.plan;
        assert_eq!(plan.hook, "Most teams get agent orchestration wrong.");
        assert_eq!(plan.narrative_frame, "Problem -> Insight -> Action");
        assert_eq!(
            plan.key_points,
            vec![
                "Sequential vs parallel execution",
                "Error handling",
                "Observability from day one"
            ]
        );
        assert_eq!(plan.example, "A support bot that escalates to a human.");
        assert_eq!(plan.call_to_action, "Try building your first agent today.");
    }

    #[test]
    fn hook_label_followed_by_line() {
        let text = "Hook:   Rust makes parsing fearless.   \n\nOther text";
        assert_eq!(extract_hook(text).as_deref(), Some("Rust makes parsing fearless."));
    }

    #[test]
    fn hook_runs_until_next_bold_label() {
        let text = "**Hook:** First line\nsecond line\n**Narrative Frame:** Story";
        assert_eq!(extract_hook(text).as_deref(), Some("First line\nsecond line"));
        assert_eq!(extract_narrative_frame(text).as_deref(), Some("Story"));
    }

    #[test]
    fn empty_label_is_not_a_value() {
        let text = "**Hook:**\n\n**Narrative Frame:**\nStory";
        assert_eq!(extract_hook(text), None);
    }

    #[test]
    fn call_to_action_spellings() {
        assert_eq!(
            extract_call_to_action("**Call-to-Action:** Subscribe").as_deref(),
            Some("Subscribe")
        );
        assert_eq!(
            extract_call_to_action("**Call to Action**: Share it").as_deref(),
            Some("Share it")
        );
    }

    #[test]
    fn key_points_exactly_three() {
        let text = "**Key Points:**\n- one\n- two\n- three\n\n**Example:** e";
        assert_eq!(
            extract_key_points(text),
            Some(vec!["one".to_string(), "two".to_string(), "three".to_string()])
        );
    }

    #[test]
    fn key_points_stop_at_heading() {
        let text = "**Key Points**\n- kept\n### Next\n- dropped";
        assert_eq!(extract_key_points(text), Some(vec!["kept".to_string()]));
    }

    #[test]
    fn key_points_without_bullets_is_none() {
        assert_eq!(extract_key_points("**Key Points:** none listed\n\nprose"), None);
        assert_eq!(extract_key_points("- bullet without label"), None);
    }

    #[test]
    fn fields_default_independently() {
        let result = extract_plan("**Example:** only an example");
        assert!(!result.section_found);
        assert_eq!(result.fields_found, 1);
        assert_eq!(result.plan.example, "only an example");
        assert_eq!(result.plan.hook, PLAN_DEFAULTS.hook);
        assert_eq!(result.plan.call_to_action, PLAN_DEFAULTS.call_to_action);
    }

    #[test]
    fn no_plan_gives_exact_defaults() {
        let result = extract_plan("Just some prose with no labels.");
        assert_eq!(result.fields_found, 0);
        assert_eq!(result.plan, PLAN_DEFAULTS.to_plan());
    }

    #[test]
    fn labels_after_plan_section_are_ignored() {
        let text = "## A) Plan\n**Example:** in plan\n## B) Outputs\n**Hook:** outside";
        let result = extract_plan(text);
        assert_eq!(result.plan.hook, PLAN_DEFAULTS.hook);
        assert_eq!(result.plan.example, "in plan");
    }
}
