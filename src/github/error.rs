use thiserror::Error;

/// Errors produced by the rate-limited fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every attempt allowed by the retry budget returned a non-2xx status
    /// or failed in transport.
    #[error("request failed after {retries} retries: {url}")]
    RetriesExhausted { url: String, retries: u32 },

    /// A response body had a shape the caller cannot use, e.g. a paginated
    /// response whose body is not an array.
    #[error("unexpected payload from {url}: {reason}")]
    UnexpectedPayload { url: String, reason: String },

    #[error("failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid timestamp '{value}', expected YYYY-MM-DDTHH:MM:SSZ")]
    Timestamp { value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, FetchError::RetriesExhausted { .. })
    }
}
