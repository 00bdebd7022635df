// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini generateContent API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use solace_core::{Provider, ProviderKind, SolaceError};
use solace_config::model::GeminiConfig;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Gemini-backed [`Provider`].
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Build from config. Returns `None` when no API key is configured,
    /// which removes the Gemini stage from the cascade.
    pub fn from_config(config: &GeminiConfig) -> Result<Option<Self>, SolaceError> {
        let Some(api_key) = &config.api_key else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SolaceError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Some(Self {
            client,
            api_key: api_key.clone(),
            model: config.model.clone(),
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
impl Provider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn send(&self, prompt: &str, timeout: Duration) -> Result<String, SolaceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| SolaceError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "gemini response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolaceError::provider(format!(
                "Gemini API returned {status}: {body}"
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| SolaceError::Provider {
            message: format!("failed to parse Gemini response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(SolaceError::provider("Gemini returned no candidate text"));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::from_config(&GeminiConfig {
            api_key: Some("gm-test-key".into()),
            model: "gemini-2.0-flash".into(),
        })
        .unwrap()
        .unwrap()
        .with_base_url(base_url.to_string())
    }

    #[test]
    fn absent_api_key_disables_the_stage() {
        let client = GeminiClient::from_config(&GeminiConfig::default()).unwrap();
        assert!(client.is_none());
    }

    #[tokio::test]
    async fn send_extracts_candidate_text() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "That sounds really hard."}], "role": "model"}}
            ]
        });
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "gm-test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"text": "hello"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let text = test_client(&server.uri())
            .send("hello", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(text, "That sounds really hard.");
    }

    #[tokio::test]
    async fn http_error_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .send("hello", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, SolaceError::Provider { .. }));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .send("hello", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no candidate text"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .send("hello", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
