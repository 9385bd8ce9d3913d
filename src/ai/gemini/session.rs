//! Per-request sessions against the Gemini REST API.
//!
//! A session is opened for exactly one call and released when dropped, so
//! every exit path (including a cancelled future) closes it.

use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::models::DEFAULT_GEMINI_BASE_URL;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

#[async_trait]
pub trait ContentSession: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// Opens scoped sessions. Dropping the returned session releases it.
pub trait SessionFactory: Send + Sync {
    fn open(&self, api_key: &str) -> Result<Box<dyn ContentSession>>;
}

/// Opens a fresh HTTP session to Gemini for each request.
#[derive(Debug, Clone)]
pub struct GeminiSessionFactory {
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiSessionFactory {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Bound each request. Without this the call waits as long as the
    /// service takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for GeminiSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for GeminiSessionFactory {
    fn open(&self, api_key: &str) -> Result<Box<dyn ContentSession>> {
        if api_key.trim().is_empty() {
            return Err(Error::AiProvider("Gemini API key is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        tracing::debug!("Opened Gemini session against {}", self.base_url);
        Ok(Box::new(GeminiSession {
            client,
            api_key: api_key.to_string(),
            base_url: self.base_url.clone(),
        }))
    }
}

/// One open connection pool to Gemini, owned by a single request.
pub struct GeminiSession {
    client: Client,
    api_key: String,
    base_url: String,
}

#[async_trait]
impl ContentSession for GeminiSession {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let model = model.strip_prefix("models/").unwrap_or(model);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );

        tracing::debug!("Sending generateContent request to Gemini (model: {})", model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Gemini API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }
}

impl Drop for GeminiSession {
    fn drop(&mut self) {
        tracing::debug!("Released Gemini session against {}", self.base_url);
    }
}
