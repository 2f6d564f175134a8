//! Blocking-free HTTP GET used by every price source

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::shared::errors::{AppError, FetchError};

/// Text GET with optional headers
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FetchError>;
}

/// reqwest-backed client
pub struct ReqwestHttpClient {
    http_client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let mut request = self.http_client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }
}
