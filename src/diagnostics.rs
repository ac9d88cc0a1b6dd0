//! Extraction diagnostics.
//!
//! [`ExtractionReport`] records what happened while turning an agent reply
//! into a [`ParsedContent`](crate::ParsedContent): which strategy won, why the
//! earlier ones failed, how much of the plan and outputs the heuristic
//! extractors actually found, and whether the fallback record was used.
//!
//! The parsed record never carries this information; the report is returned
//! alongside it by [`ResponseParser::parse_with_report`](crate::ResponseParser::parse_with_report).

use std::fmt;

use crate::types::Platform;

/// A strategy that was tried and did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub reason: String,
}

/// Coarse grading of an extraction, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quality {
    /// The reply was structured JSON and decoded as-is.
    Structured,
    /// Heuristic extraction found every plan field and an outputs section.
    Complete,
    /// Heuristic extraction succeeded but placeholders or duplication were used.
    Partial,
    /// Every strategy failed; the fallback record was produced.
    Degraded,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Structured => "structured",
            Quality::Complete => "complete",
            Quality::Partial => "partial",
            Quality::Degraded => "degraded",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records what happened during extraction.
///
/// # Example
///
/// ```
/// use storycircuit::diagnostics::{ExtractionReport, Quality};
///
/// let report = ExtractionReport::default();
/// assert!(report.ok()); // no fallback reason means success
/// assert_eq!(report.quality(), Quality::Degraded); // but nothing has run yet
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    /// Which strategy produced the record, e.g. `"json"`, `"fenced_json"`,
    /// `"heuristic"`. `None` when the fallback record was used.
    pub strategy: Option<&'static str>,

    /// Strategies tried before the winner, in order.
    pub attempts: Vec<StrategyFailure>,

    /// Whether an `A) Plan` heading was found (heuristic only).
    pub plan_section_found: bool,

    /// How many plan fields were extracted rather than defaulted (0-5).
    pub plan_fields_found: u8,

    /// Whether a `B) Outputs` heading was found (heuristic only).
    pub outputs_section_found: bool,

    /// Platforms present in the record's outputs.
    pub platforms_found: Vec<Platform>,

    /// Whether the duplication fallback filled the outputs.
    pub duplicated: bool,

    /// Why the fallback record was produced. `None` means a strategy won.
    pub fallback_reason: Option<String>,
}

impl ExtractionReport {
    /// Quick check: did some strategy succeed?
    pub fn ok(&self) -> bool {
        self.fallback_reason.is_none()
    }

    pub fn quality(&self) -> Quality {
        match self.strategy {
            None => Quality::Degraded,
            Some(_) if !self.ok() => Quality::Degraded,
            Some("heuristic") => {
                if self.plan_fields_found == 5 && self.outputs_section_found && !self.duplicated {
                    Quality::Complete
                } else {
                    Quality::Partial
                }
            }
            Some(_) => Quality::Structured,
        }
    }

    pub(crate) fn record_failure(&mut self, strategy: &'static str, reason: impl ToString) {
        self.attempts.push(StrategyFailure {
            strategy,
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ok_but_degraded() {
        let r = ExtractionReport::default();
        assert!(r.ok());
        assert!(r.strategy.is_none());
        assert!(r.attempts.is_empty());
        assert_eq!(r.plan_fields_found, 0);
        assert_eq!(r.quality(), Quality::Degraded);
    }

    #[test]
    fn fallback_reason_is_not_ok() {
        let r = ExtractionReport {
            fallback_reason: Some("empty agent reply".to_string()),
            ..Default::default()
        };
        assert!(!r.ok());
        assert_eq!(r.quality(), Quality::Degraded);
    }

    #[test]
    fn json_strategy_is_structured() {
        let r = ExtractionReport {
            strategy: Some("json"),
            ..Default::default()
        };
        assert_eq!(r.quality(), Quality::Structured);
    }

    #[test]
    fn heuristic_grading() {
        let complete = ExtractionReport {
            strategy: Some("heuristic"),
            plan_section_found: true,
            plan_fields_found: 5,
            outputs_section_found: true,
            ..Default::default()
        };
        assert_eq!(complete.quality(), Quality::Complete);

        let partial = ExtractionReport {
            plan_fields_found: 3,
            ..complete.clone()
        };
        assert_eq!(partial.quality(), Quality::Partial);

        let duplicated = ExtractionReport {
            outputs_section_found: false,
            duplicated: true,
            ..complete
        };
        assert_eq!(duplicated.quality(), Quality::Partial);
    }

    #[test]
    fn record_failure_appends_in_order() {
        let mut r = ExtractionReport::default();
        r.record_failure("json", "not json");
        r.record_failure("fenced_json", "no block");
        assert_eq!(r.attempts.len(), 2);
        assert_eq!(r.attempts[0].strategy, "json");
        assert_eq!(r.attempts[1].reason, "no block");
    }

    #[test]
    fn quality_orders_best_first() {
        assert!(Quality::Structured < Quality::Degraded);
        assert_eq!(Quality::Partial.to_string(), "partial");
    }
}
