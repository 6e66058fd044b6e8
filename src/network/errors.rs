use thiserror::Error;

// * Unified error taxonomy for the extraction pipeline.
// * Resolver kinds degrade gracefully; fetch and upstream kinds end the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(usize),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {status_code}")]
    HttpError { status_code: u16 },

    #[error("Upstream extraction failed: {detail}")]
    UpstreamError { detail: String },
}

impl ExtractionError {
    // * Classifies a transport error from reqwest.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }

        if let Some(status) = err.status() {
            return Self::HttpError {
                status_code: status.as_u16(),
            };
        }

        if err.is_builder() {
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();
            return Self::InvalidUrl(url);
        }

        Self::NetworkError(err.to_string())
    }

    pub fn upstream(detail: impl Into<String>) -> Self {
        Self::UpstreamError {
            detail: detail.into(),
        }
    }

    // * True for hard-dependency failures (page fetch, AI upstream).
    // * Resolver failures are never fatal on their own.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::NetworkError(_) | Self::HttpError { .. } | Self::UpstreamError { .. }
        )
    }

    // * Stable label for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::TooManyRedirects(_) => "too_many_redirects",
            Self::Timeout => "timeout",
            Self::NetworkError(_) => "network_error",
            Self::HttpError { .. } => "http_error",
            Self::UpstreamError { .. } => "upstream_error",
        }
    }
}
