use serde::Deserialize;
use thiserror::Error;

/// Error code Marqo reports when creating an index that is already present
pub const INDEX_ALREADY_EXISTS: &str = "index_already_exists";

/// Errors raised while talking to the vector-search service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Api(ApiError),

    #[error("Transport error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Failed to decode service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Document {id} rejected ({code}): {message}")]
    DocumentRejected {
        id: String,
        code: String,
        message: String,
    },

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}

/// Error body returned by Marqo alongside a non-success status
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl std::fmt::Display for ApiError {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.code.is_empty() {
            write!(f, "HTTP {}: {}", self.status, self.message)
        } else {
            write!(f, "HTTP {} ({}): {}", self.status, self.code, self.message)
        }
    }
}

impl ApiError {
    /// Build an error from a non-success response body.
    ///
    /// Bodies that are not the usual JSON error object are kept verbatim as
    /// the message.
    #[inline]
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiError>(body) {
            Ok(error) if !(error.code.is_empty() && error.message.is_empty()) => {
                Self { status, ..error }
            }
            _ => Self {
                status,
                code: String::new(),
                message: body.trim().to_string(),
                kind: String::new(),
            },
        }
    }
}

impl ServiceError {
    /// Whether this is the service telling us the index was already created
    #[inline]
    pub fn is_index_already_exists(&self) -> bool {
        matches!(self, Self::Api(api) if api.code == INDEX_ALREADY_EXISTS)
    }
}
