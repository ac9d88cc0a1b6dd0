//! Error types for extraction strategies.

use crate::types::UnsupportedPlatform;

/// Why a single extraction strategy could not produce a record.
///
/// These never leave [`ResponseParser`](crate::ResponseParser): they are logged,
/// recorded in the [`ExtractionReport`](crate::ExtractionReport), and the next
/// strategy (or the fallback record) takes over.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The agent reply was empty or whitespace-only.
    #[error("empty agent reply")]
    EmptyResponse,

    /// The reply does not carry the structure this strategy looks for.
    #[error("no {expected} found in agent reply: {text}")]
    NotStructured {
        /// What the strategy was looking for.
        expected: &'static str,
        /// A truncated copy of the reply (max 200 chars).
        text: String,
    },

    /// Structured data was found but did not decode into a content pack.
    #[error("structured reply did not decode: {0}")]
    Json(#[from] serde_json::Error),

    /// A structured reply keyed an output by a platform outside the supported set.
    #[error(transparent)]
    UnsupportedPlatform(#[from] UnsupportedPlatform),

    /// The reply is larger than the heuristic extractor is allowed to scan.
    #[error("agent reply is {len} bytes, limit is {max}")]
    InputTooLarge {
        /// Reply size in bytes.
        len: usize,
        /// Configured limit in bytes.
        max: usize,
    },
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...", &s[..idx]),
    }
}
