//! The record produced when every extraction strategy failed.

use std::collections::BTreeMap;

use serde_json::Map;

use crate::extract::patterns::FALLBACK_PLAN;
use crate::types::ParsedContent;

/// Build the fallback record for `raw`.
///
/// Performs no parsing and cannot fail. `notes` keeps the reply verbatim;
/// only an empty reply is replaced with an `Error: <reason>` line.
pub fn fallback(raw: &str, reason: &str) -> ParsedContent {
    let notes = if raw.is_empty() {
        format!("Error: {reason}")
    } else {
        raw.to_string()
    };

    ParsedContent {
        plan: FALLBACK_PLAN.to_plan(),
        outputs: BTreeMap::new(),
        notes,
        extra: Map::new(),
    }
}
