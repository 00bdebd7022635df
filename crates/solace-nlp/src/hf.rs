// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hugging Face inference API extractor.
//!
//! Overlays model sentiment and emotion on top of the rule-based analysis.
//! Every model signal passes a confidence threshold before it is accepted;
//! a low-confidence label degrades to neutral/none rather than guessing.
//! Any API failure falls back to the rule tables, so this extractor only
//! fails on internal errors, never on network weather.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

use solace_core::{
    Emotion, FeatureExtractor, NlpFeatures, Sentiment, SentimentLabel, SolaceError,
};
use solace_config::model::NlpConfig;

use crate::rules;

const SENTIMENT_URL: &str =
    "https://api-inference.huggingface.co/models/nlptown/bert-base-multilingual-uncased-sentiment";
const EMOTION_URL: &str =
    "https://api-inference.huggingface.co/models/bhadresh-savani/distilbert-base-uncased-emotion";

/// One classifier label with its score.
#[derive(Debug, Deserialize)]
struct Classification {
    label: String,
    score: f32,
}

/// Model-backed extractor with rule-based fallback.
#[derive(Debug, Clone)]
pub struct HfApiExtractor {
    client: reqwest::Client,
    sentiment_url: String,
    emotion_url: String,
    sentiment_threshold: f32,
    emotion_threshold: f32,
}

impl HfApiExtractor {
    /// Build from config. Returns `None` when no API key is configured;
    /// callers should use [`rules::RuleBasedExtractor`] instead.
    pub fn from_config(config: &NlpConfig) -> Result<Option<Self>, SolaceError> {
        let Some(api_key) = &config.api_key else {
            return Ok(None);
        };

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| SolaceError::Config(format!("invalid nlp api key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SolaceError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Some(Self {
            client,
            sentiment_url: SENTIMENT_URL.to_string(),
            emotion_url: EMOTION_URL.to_string(),
            sentiment_threshold: config.sentiment_threshold,
            emotion_threshold: config.emotion_threshold,
        }))
    }

    /// Overrides the endpoint base (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.sentiment_url = format!("{base}/sentiment");
        self.emotion_url = format!("{base}/emotion");
        self
    }

    /// Query one endpoint and return the top-scoring label.
    async fn top_classification(
        &self,
        url: &str,
        text: &str,
    ) -> Result<Classification, SolaceError> {
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| SolaceError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolaceError::provider(format!("API returned {status}: {body}")));
        }

        // The API returns either [[{..}, ..]] or [{..}, ..].
        let body = response.text().await.map_err(|e| SolaceError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let items: Vec<Classification> =
            match serde_json::from_str::<Vec<Vec<Classification>>>(&body) {
                Ok(nested) => nested.into_iter().flatten().collect(),
                Err(_) => serde_json::from_str(&body).map_err(|e| {
                    SolaceError::provider(format!("failed to parse API response: {e}"))
                })?,
            };

        items
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| SolaceError::provider("empty classification response"))
    }

    async fn model_sentiment(&self, text: &str) -> Result<Sentiment, SolaceError> {
        let top = self.top_classification(&self.sentiment_url, text).await?;
        if top.score < self.sentiment_threshold {
            debug!(score = top.score, "low confidence sentiment set to neutral");
            return Ok(Sentiment::neutral());
        }
        let label = match top.label.as_str() {
            "1 star" | "2 stars" => SentimentLabel::Negative,
            "3 stars" => SentimentLabel::Neutral,
            _ => SentimentLabel::Positive,
        };
        Ok(Sentiment {
            label,
            confidence: top.score,
        })
    }

    async fn model_emotion(&self, text: &str) -> Result<Emotion, SolaceError> {
        let top = self.top_classification(&self.emotion_url, text).await?;
        if top.score <= self.emotion_threshold {
            debug!(score = top.score, "low confidence emotion set to none");
            return Ok(Emotion::None);
        }
        Ok(match top.label.to_lowercase().as_str() {
            "sadness" => Emotion::Sadness,
            "joy" | "love" => Emotion::Joy,
            "anger" => Emotion::Anger,
            "fear" => Emotion::Fear,
            _ => Emotion::None,
        })
    }
}

#[async_trait]
impl FeatureExtractor for HfApiExtractor {
    async fn analyze(&self, text: &str) -> Result<NlpFeatures, SolaceError> {
        if text.trim().is_empty() {
            return Ok(NlpFeatures::neutral());
        }
        let lower = text.to_lowercase();
        let mut features = rules::analyze_rules(text);

        match self.model_sentiment(text).await {
            Ok(sentiment) => features.sentiment = sentiment,
            Err(e) => warn!(error = %e, "sentiment API failed, keeping rule-based value"),
        }
        match self.model_emotion(text).await {
            Ok(emotion) => features.emotion = emotion,
            Err(e) => warn!(error = %e, "emotion API failed, keeping rule-based value"),
        }

        // Explicit distress keywords beat the model either way.
        rules::apply_overrides(&lower, &mut features);
        Ok(features)
    }
}
