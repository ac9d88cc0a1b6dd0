//! Request screening: sensitive-data scan, request validation and input
//! sanitization, run before anything reaches the agent.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::types::{Platform, UnsupportedPlatform};

pub const TOPIC_MIN_CHARS: usize = 3;
pub const TOPIC_MAX_CHARS: usize = 500;
pub const AUDIENCE_MAX_CHARS: usize = 200;
pub const CONTEXT_MAX_CHARS: usize = 1000;
pub const MAX_PLATFORMS: usize = 5;

/// Phrases that mark text as not for public content.
pub const RESTRICTED_KEYWORDS: [&str; 10] = [
    "confidential",
    "internal only",
    "do not share",
    "proprietary",
    "customer name",
    "personal data",
    "private",
    "restricted",
    "msft confidential",
    "microsoft confidential",
];

/// A category of sensitive data the scanner recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensitiveKind {
    ApiKey,
    Password,
    Secret,
    ConnectionString,
    Email,
    Phone,
    Ssn,
    CreditCard,
    IpAddress,
    SubscriptionId,
    ConfidentialMarker,
}

impl SensitiveKind {
    pub const ALL: [SensitiveKind; 11] = [
        SensitiveKind::ApiKey,
        SensitiveKind::Password,
        SensitiveKind::Secret,
        SensitiveKind::ConnectionString,
        SensitiveKind::Email,
        SensitiveKind::Phone,
        SensitiveKind::Ssn,
        SensitiveKind::CreditCard,
        SensitiveKind::IpAddress,
        SensitiveKind::SubscriptionId,
        SensitiveKind::ConfidentialMarker,
    ];

    pub fn description(self) -> &'static str {
        match self {
            SensitiveKind::ApiKey => "api key",
            SensitiveKind::Password => "password",
            SensitiveKind::Secret => "secret",
            SensitiveKind::ConnectionString => "connection string",
            SensitiveKind::Email => "email",
            SensitiveKind::Phone => "phone",
            SensitiveKind::Ssn => "ssn",
            SensitiveKind::CreditCard => "credit card",
            SensitiveKind::IpAddress => "ip address",
            SensitiveKind::SubscriptionId => "subscription id",
            SensitiveKind::ConfidentialMarker => "confidential marker",
        }
    }

    fn regex(self) -> &'static Regex {
        &SENSITIVE_PATTERNS[self as usize]
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Indexed by `SensitiveKind as usize`, which follows [`SensitiveKind::ALL`].
static SENSITIVE_PATTERNS: Lazy<[Regex; 11]> = Lazy::new(|| {
    SensitiveKind::ALL.map(|kind| {
        compile(match kind {
            SensitiveKind::ApiKey => r#"(?i)(api[_-]?key|apikey)['"\s:=]+[a-zA-Z0-9_-]{20,}"#,
            SensitiveKind::Password => r#"(?i)(password|passwd|pwd)['"\s:=]+\S+"#,
            SensitiveKind::Secret => r#"(?i)(secret|token|auth)['"\s:=]+[a-zA-Z0-9_-]{20,}"#,
            SensitiveKind::ConnectionString => {
                r"(?i)(DefaultEndpointsProtocol|AccountKey|SharedAccessSignature)="
            }
            SensitiveKind::Email => r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            SensitiveKind::Phone => r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b",
            SensitiveKind::Ssn => r"\b\d{3}-\d{2}-\d{4}\b",
            SensitiveKind::CreditCard => r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
            SensitiveKind::IpAddress => r"\b(?:\d{1,3}\.){3}\d{1,3}\b",
            SensitiveKind::SubscriptionId => {
                r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
            }
            SensitiveKind::ConfidentialMarker => {
                r"(?i)\b(confidential|internal|proprietary|msft\s+confidential)\b"
            }
        })
    })
});

/// Redactions applied by [`ContentScanner::sanitize`], in order.
const REDACTIONS: [(SensitiveKind, &str); 5] = [
    (SensitiveKind::Email, "[EMAIL-REMOVED]"),
    (SensitiveKind::Phone, "[PHONE-REMOVED]"),
    (SensitiveKind::Ssn, "[SSN-REMOVED]"),
    (SensitiveKind::CreditCard, "[CARD-REMOVED]"),
    (SensitiveKind::IpAddress, "[IP-REMOVED]"),
];

/// One issue found by [`ContentScanner::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Sensitive(SensitiveKind),
    RestrictedKeyword(&'static str),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::Sensitive(kind) => write!(f, "Detected potential {}", kind.description()),
            Finding::RestrictedKeyword(kw) => write!(f, "Contains restricted keyword: '{kw}'"),
        }
    }
}

/// Why a generation request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Topic cannot be empty")]
    EmptyTopic,

    #[error("Topic is too short (min {} characters)", TOPIC_MIN_CHARS)]
    TopicTooShort,

    #[error("Topic is too long (max {} characters)", TOPIC_MAX_CHARS)]
    TopicTooLong,

    #[error("{field} is too long (max {max} characters)")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("Topic contains restricted content: {}", join_findings(.0))]
    RestrictedContent(Vec<Finding>),

    #[error("At least one platform is required")]
    NoPlatforms,

    #[error("Too many platforms (max {})", MAX_PLATFORMS)]
    TooManyPlatforms,

    #[error("Invalid platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Platforms must be unique: {0} requested twice")]
    DuplicatePlatform(Platform),
}

fn join_findings(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<UnsupportedPlatform> for Rejection {
    fn from(e: UnsupportedPlatform) -> Self {
        Rejection::UnsupportedPlatform(e.0)
    }
}

/// Screens topics and free text for credentials, PII and confidentiality
/// markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentScanner;

impl ContentScanner {
    pub fn new() -> Self {
        Self
    }

    /// Every sensitive pattern and restricted keyword present in `text`.
    /// Empty means the text is safe.
    pub fn scan(&self, text: &str) -> Vec<Finding> {
        let mut findings: Vec<Finding> = SensitiveKind::ALL
            .into_iter()
            .filter(|kind| kind.regex().is_match(text))
            .map(Finding::Sensitive)
            .collect();

        let lower = text.to_lowercase();
        findings.extend(
            RESTRICTED_KEYWORDS
                .iter()
                .filter(|kw| lower.contains(**kw))
                .map(|kw| Finding::RestrictedKeyword(*kw)),
        );
        findings
    }

    pub fn is_safe(&self, text: &str) -> bool {
        self.scan(text).is_empty()
    }

    /// Validate a topic and platform list, returning the parsed platforms in
    /// request order.
    pub fn validate<S: AsRef<str>>(
        &self,
        topic: &str,
        platforms: &[S],
    ) -> Result<Vec<Platform>, Rejection> {
        let trimmed = topic.trim();
        if trimmed.is_empty() {
            return Err(Rejection::EmptyTopic);
        }
        if trimmed.chars().count() < TOPIC_MIN_CHARS {
            return Err(Rejection::TopicTooShort);
        }
        if topic.chars().count() > TOPIC_MAX_CHARS {
            return Err(Rejection::TopicTooLong);
        }

        let findings = self.scan(topic);
        if !findings.is_empty() {
            return Err(Rejection::RestrictedContent(findings));
        }

        if platforms.is_empty() {
            return Err(Rejection::NoPlatforms);
        }
        if platforms.len() > MAX_PLATFORMS {
            return Err(Rejection::TooManyPlatforms);
        }

        let mut seen = BTreeSet::new();
        let mut parsed = Vec::with_capacity(platforms.len());
        for raw in platforms {
            let platform: Platform = raw.as_ref().parse()?;
            if !seen.insert(platform) {
                return Err(Rejection::DuplicatePlatform(platform));
            }
            parsed.push(platform);
        }
        Ok(parsed)
    }

    /// Reject optional free-text fields over their length limit.
    pub fn validate_optional(
        &self,
        field: &'static str,
        value: Option<&str>,
        max: usize,
    ) -> Result<(), Rejection> {
        match value {
            Some(v) if v.chars().count() > max => Err(Rejection::FieldTooLong { field, max }),
            _ => Ok(()),
        }
    }

    /// Redact emails, phone numbers, SSNs, card numbers and IP addresses.
    pub fn sanitize(&self, text: &str) -> String {
        REDACTIONS
            .iter()
            .fold(text.to_string(), |acc, (kind, replacement)| {
                kind.regex().replace_all(&acc, *replacement).into_owned()
            })
    }
}
