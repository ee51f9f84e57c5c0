use thiserror::Error;

#[derive(Debug, Error)]
pub enum AetherError {
    #[error("timeout after {0}ms")]
    Timeout(u64),

    #[error("rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("upstream error from {provider}: {message}")]
    Upstream {
        provider: String,
        message: String,
        status: Option<u16>,
    },

    #[error("auth failed for {provider}: {message}")]
    AuthFailed { provider: String, message: String },

    #[error("content blocked by {provider}: {reason}")]
    Blocked { provider: String, reason: String },

    #[error("schema parse error: {0}")]
    SchemaParse(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("session store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl AetherError {
    /// Extract provider name from structured error variants.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::RateLimited { provider } => Some(provider),
            Self::Upstream { provider, .. } => Some(provider),
            Self::AuthFailed { provider, .. } => Some(provider),
            Self::Blocked { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// Produce a sanitized error message safe for returning to MCP clients.
    /// Does not leak internal URLs, API keys, or upstream error bodies.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout(ms) => format!("request timed out after {ms}ms"),
            Self::RateLimited { provider } => {
                format!("rate limited by {provider}, try again shortly")
            }
            Self::Upstream {
                provider, status, ..
            } => match status {
                Some(code) => format!("upstream error from {provider} (HTTP {code})"),
                None => format!("upstream error from {provider}"),
            },
            Self::AuthFailed { provider, .. } => {
                format!("authentication failed for {provider}")
            }
            Self::Blocked { reason, .. } => format!("content was blocked: {reason}"),
            Self::SchemaParse(_) => "failed to parse provider response".to_string(),
            Self::Request(_) => "request to provider failed".to_string(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::Store(_) => "failed to access saved sessions".to_string(),
            Self::Config(msg) => format!("configuration error: {msg}"),
            Self::Other(msg) => msg.clone(),
        }
    }
}

/// Internal failure inside one section parser. Never leaves the parser:
/// each public parse operation maps it to that operation's error fallback.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("pattern failed to compile: {0}")]
    Pattern(String),

    #[error("response too large: {len} bytes (max {max})")]
    InputTooLarge { len: usize, max: usize },
}

impl From<&regex::Error> for ParseError {
    fn from(e: &regex::Error) -> Self {
        Self::Pattern(e.to_string())
    }
}
