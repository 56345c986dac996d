//! The gateway seam between sync logic and the Mailchimp REST API
//!
//! Callers branch on [`ApiResponse`] for the "does not exist yet" case and
//! use `?` for everything else.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::operations::Operation;

/// Outcome of a request that reached the server and was not rejected
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 2xx with the parsed body (an empty body parses as `{}`)
    Found(Value),
    /// 404
    NotFound,
}

impl ApiResponse {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiResponse::NotFound)
    }

    /// Deserialize the body into `T`; `NotFound` maps to `Ok(None)`
    pub fn decode<T: DeserializeOwned>(self, resource: &str) -> Result<Option<T>, ApiError> {
        match self {
            ApiResponse::Found(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| ApiError::Decode {
                    resource: resource.to_string(),
                    source,
                }),
            ApiResponse::NotFound => Ok(None),
        }
    }

    /// Deserialize the body into `T`, treating a 404 as an error
    pub fn require<T: DeserializeOwned>(
        self,
        method: &'static str,
        resource: &str,
    ) -> Result<T, ApiError> {
        self.decode(resource)?
            .ok_or_else(|| ApiError::UnexpectedNotFound {
                method,
                resource: resource.to_string(),
            })
    }
}

/// Executes [`Operation`]s against the mailing-list service.
///
/// Implementations authenticate every call the same way and never retry.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn execute(&self, operation: &Operation) -> Result<ApiResponse, ApiError>;

    async fn get(&self, resource: &str) -> Result<ApiResponse, ApiError> {
        self.execute(&Operation::get(resource)).await
    }

    async fn post(&self, resource: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.execute(&Operation::create(resource, body)).await
    }

    async fn patch(&self, resource: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.execute(&Operation::update(resource, body)).await
    }
}
