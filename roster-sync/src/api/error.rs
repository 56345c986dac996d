//! Gateway error type

use thiserror::Error;

/// Failures surfaced by a [`Gateway`](super::Gateway).
///
/// A 404 is not an error at this layer; it is reported as
/// [`ApiResponse::NotFound`](super::ApiResponse::NotFound).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx, non-404 status
    #[error("{method} {resource} failed with HTTP status {status}")]
    Status {
        method: &'static str,
        resource: String,
        status: u16,
    },

    /// The request never produced an HTTP response
    #[error("{method} {resource} could not be completed")]
    Transport {
        method: &'static str,
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape we expected
    #[error("Failed to decode response from {resource}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    /// A 404 where the caller needed the resource to exist
    #[error("{method} {resource} returned not found")]
    UnexpectedNotFound {
        method: &'static str,
        resource: String,
    },

    #[error("Invalid API base URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl ApiError {
    /// HTTP status code carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::UnexpectedNotFound { .. } => Some(404),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            ApiError::Decode { .. } | ApiError::InvalidUrl { .. } => None,
        }
    }
}
