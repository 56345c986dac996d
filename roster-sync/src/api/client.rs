//! HTTP implementation of the [`Gateway`] for the Mailchimp v3 API

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{StatusCode, Url};
use serde_json::{Map, Value};

use super::error::ApiError;
use super::gateway::{ApiResponse, Gateway};
use super::operations::Operation;

/// Basic-auth REST client bound to one API root
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    api_key: String,
    page_size: u32,
}

impl MailchimpClient {
    /// Create a client for `base_url` using the given credentials.
    ///
    /// `page_size` is sent as `count` on every GET; offsets always start at 0,
    /// so collections larger than one page are truncated.
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        api_key: impl Into<String>,
        page_size: u32,
    ) -> Result<Self, ApiError> {
        let mut root = base_url.trim().to_string();
        if !root.ends_with('/') {
            root.push('/');
        }

        let base_url = Url::parse(&root).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            username: username.into(),
            api_key: api_key.into(),
            page_size,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, resource: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(resource.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{}", self.base_url, resource),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl Gateway for MailchimpClient {
    async fn execute(&self, operation: &Operation) -> Result<ApiResponse, ApiError> {
        let method = operation.http_method();
        let resource = operation.resource();
        let url = self.url(resource)?;

        debug!("{} {}", method, url);

        let request = match operation {
            Operation::Get { .. } => self.http.get(url).query(&[
                ("count", self.page_size.to_string()),
                ("offset", "0".to_string()),
            ]),
            Operation::Create { data, .. } => self.http.post(url).json(data),
            Operation::Update { data, .. } => self.http.patch(url).json(data),
        };

        let transport = |source: reqwest::Error| ApiError::Transport {
            method,
            resource: resource.to_string(),
            source,
        };

        let response = request
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} {} -> 404", method, resource);
            return Ok(ApiResponse::NotFound);
        }

        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            warn!(
                "{} {} failed with status {}: {}",
                method,
                resource,
                status.as_u16(),
                body
            );
            return Err(ApiError::Status {
                method,
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        if body.trim().is_empty() {
            return Ok(ApiResponse::Found(Value::Object(Map::new())));
        }

        let value = serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            resource: resource.to_string(),
            source,
        })?;

        Ok(ApiResponse::Found(value))
    }
}
