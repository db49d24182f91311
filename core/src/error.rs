//! Error types for the Klout API client.
//!
//! # Design
//! Each status class the Klout API documents gets its own variant so callers
//! can branch on the kind of failure. `BadRequest` and `ClientError` keep the
//! JSON body the server sent; the other HTTP variants carry no body. URL
//! resolution, decoding and transport failures have their own variants.

use serde_json::Value;

/// Errors returned by `KloutClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 400. `data` is the parsed error body.
    #[error("the Klout API responded with the following error - {data}")]
    BadRequest { data: Value },

    /// The server returned 401; usually a missing or wrong API key.
    #[error("unauthorized")]
    Unauthorized,

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// Any other 4xx status.
    #[error("client error (HTTP {status}): {data}")]
    ClientError { status: u16, data: Value },

    /// Any 5xx status.
    #[error("server error (HTTP {status})")]
    ServerError { status: u16 },

    /// A base URL or request path could not be resolved into a URL.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A success body could not be decoded into the expected shape.
    #[error("decoding failed: {0}")]
    Decode(String),

    /// The request never produced an HTTP response.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// The JSON error body, for the variants that carry one.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiError::BadRequest { data } | ApiError::ClientError { data, .. } => Some(data),
            _ => None,
        }
    }

    /// The HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest { .. } => Some(400),
            ApiError::Unauthorized => Some(401),
            ApiError::NotFound => Some(404),
            ApiError::ClientError { status, .. } | ApiError::ServerError { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
