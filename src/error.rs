//! Error types for backend calls and the pipelines built on top of them.
//!
//! Shape problems inside a record never surface here: normalization absorbs
//! them. Only transport failures, non-2xx statuses and bodies that are not
//! the expected JSON envelope become errors.

/// Failure of a single backend round-trip.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("{endpoint} returned a malformed body: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Request { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Malformed { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("search failed: {0}")]
    SearchFailed(#[source] ApiError),

    #[error("live feed fetch failed: {0}")]
    FeedFailed(#[source] ApiError),

    #[error("suggestion fetch failed: {0}")]
    SuggestionsFailed(#[source] ApiError),
}

pub type Result<T, E = HubError> = std::result::Result<T, E>;
