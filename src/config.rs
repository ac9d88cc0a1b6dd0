//! Parser and service configuration.

use std::time::Duration;

use crate::error::{ContentError, Result};

/// Largest reply the heuristic extractor will scan (1 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

pub const DEFAULT_AGENT_NAME: &str = "Social-Media-Communication-Agent";
pub const DEFAULT_AGENT_VERSION: &str = "storycircuit-v1.0";
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_AGENT_NAME: &str = "STORYCIRCUIT_AGENT_NAME";
pub const ENV_AGENT_VERSION: &str = "STORYCIRCUIT_AGENT_VERSION";
pub const ENV_AGENT_TIMEOUT_SECS: &str = "STORYCIRCUIT_AGENT_TIMEOUT_SECS";
pub const ENV_MAX_INPUT_BYTES: &str = "STORYCIRCUIT_MAX_INPUT_BYTES";

/// Configuration for [`ResponseParser`](crate::ResponseParser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Replies larger than this skip heuristic extraction and fall back.
    pub max_input_bytes: usize,

    /// Try a fenced ```` ```json ```` block before heuristic extraction.
    pub fenced_json: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            fenced_json: true,
        }
    }
}

impl ParserConfig {
    pub fn with_max_input_bytes(mut self, bytes: usize) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    pub fn with_fenced_json(mut self, enabled: bool) -> Self {
        self.fenced_json = enabled;
        self
    }
}

/// Configuration for [`ContentService`](crate::ContentService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Name of the hosted agent the backend is asked to run.
    pub agent_name: String,

    /// Recorded in every record's metadata.
    pub agent_version: String,

    /// Upper bound on a single backend call.
    pub agent_timeout: Duration,

    pub parser: ParserConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            agent_version: DEFAULT_AGENT_VERSION.to_string(),
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
            parser: ParserConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_agent_version(mut self, version: impl Into<String>) -> Self {
        self.agent_version = version.into();
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Defaults overridden by `STORYCIRCUIT_*` environment variables.
    ///
    /// Unset or blank variables keep their defaults; a malformed number is
    /// [`ContentError::InvalidConfig`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(name) = get(ENV_AGENT_NAME) {
            config.agent_name = name;
        }
        if let Some(version) = get(ENV_AGENT_VERSION) {
            config.agent_version = version;
        }
        if let Some(secs) = get(ENV_AGENT_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_AGENT_TIMEOUT_SECS, &secs)?;
            if secs == 0 {
                return Err(ContentError::InvalidConfig(format!(
                    "{ENV_AGENT_TIMEOUT_SECS} must be greater than zero"
                )));
            }
            config.agent_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = get(ENV_MAX_INPUT_BYTES) {
            config.parser.max_input_bytes = parse_number(ENV_MAX_INPUT_BYTES, &bytes)?;
        }
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ContentError::InvalidConfig(format!("{key}={value:?} is not a valid number")))
}
