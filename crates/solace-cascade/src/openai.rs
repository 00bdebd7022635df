// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use solace_core::{Provider, ProviderKind, SolaceError};
use solace_config::model::OpenAiConfig;

const API_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// OpenAI-backed [`Provider`].
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl OpenAiClient {
    /// Build from config. Returns `None` when no API key is configured,
    /// which removes the OpenAI stage from the cascade.
    pub fn from_config(config: &OpenAiConfig) -> Result<Option<Self>, SolaceError> {
        let Some(api_key) = &config.api_key else {
            return Ok(None);
        };
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| SolaceError::Config(format!("invalid OpenAI api key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SolaceError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Some(Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: API_BASE_URL.to_string(),
        }))
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl Provider for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn send(&self, prompt: &str, timeout: Duration) -> Result<String, SolaceError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| SolaceError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "openai response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolaceError::provider(format!(
                "OpenAI API returned {status}: {body}"
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| SolaceError::Provider {
            message: format!("failed to parse OpenAI response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(SolaceError::provider("OpenAI returned no choice text"));
        }
        Ok(text)
    }
}
