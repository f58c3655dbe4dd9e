use crate::domain::model::ProviderKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FyError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Time error: {0}")]
    Time(#[from] std::time::SystemTimeError),
}

/// What went wrong inside a provider adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Transport-level failure, no usable HTTP response.
    Network,
    /// HTTP call succeeded but the payload carries the provider's own
    /// error code. Youdao and Baidu always answer 200, so rejection is
    /// only ever visible here.
    Rejected,
    /// The language pair cannot be expressed in this provider's code
    /// space. Raised before any network call.
    UnsupportedLanguagePair,
    /// Payload shape did not match what the adapter expects.
    Parse,
    /// The caller cancelled the in-flight request.
    Cancelled,
}

impl ProviderErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::Network => "network failure",
            ProviderErrorKind::Rejected => "rejected by provider",
            ProviderErrorKind::UnsupportedLanguagePair => "unsupported language pair",
            ProviderErrorKind::Parse => "parse failure",
            ProviderErrorKind::Cancelled => "cancelled",
        }
    }
}

/// Typed adapter failure: provider tag, classification, the provider's
/// own error code when it supplied one, and a human-readable message.
#[derive(Error, Debug, Clone)]
#[error("{provider} {}: {message}{}", .kind.as_str(), .code.as_deref().map(|c| format!(" (code {c})")).unwrap_or_default())]
pub struct ProviderError {
    pub provider: ProviderKind,
    pub kind: ProviderErrorKind,
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(
        provider: ProviderKind,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn rejected(
        provider: ProviderKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            kind: ProviderErrorKind::Rejected,
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn cancelled(provider: ProviderKind) -> Self {
        Self::new(
            provider,
            ProviderErrorKind::Cancelled,
            "request cancelled by caller",
        )
    }

    /// Classify a reqwest error. Anything that produced no usable
    /// response body is a transport failure.
    pub fn from_transport(provider: ProviderKind, err: reqwest::Error) -> Self {
        Self::new(provider, ProviderErrorKind::Network, err.to_string())
    }
}
