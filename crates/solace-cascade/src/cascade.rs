// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider cascade.
//!
//! Stages are tried in configured order; each attempt is bounded by the
//! per-attempt timeout and a failed stage enters a cooldown during which it
//! is skipped outright. The builtin responder is the terminal stage: it is
//! never skipped, never cooled down, and cannot fail, so [`Cascade::generate`]
//! always produces a reply.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, info, warn};

use solace_core::{
    NlpFeatures, Provider, ProviderKind, ResponseCandidate, ResponseStyle, SolaceError,
};
use solace_config::model::{CascadeConfig, GeminiConfig, OpenAiConfig};

use crate::builtin::BuiltinResponder;
use crate::gemini::GeminiClient;
use crate::openai::OpenAiClient;
use crate::prompt::finalize_reply;

/// Ordered provider cascade with a builtin terminal stage.
pub struct Cascade {
    stages: Vec<Arc<dyn Provider>>,
    builtin: BuiltinResponder,
    attempt_timeout: Duration,
    cooldown: Duration,
    cooling: DashMap<ProviderKind, Instant>,
}

impl Cascade {
    /// Assemble the cascade from config. Stages whose API key is absent are
    /// left out; with no keys at all, only the builtin stage remains.
    pub fn from_config(
        cascade: &CascadeConfig,
        gemini: &GeminiConfig,
        openai: &OpenAiConfig,
    ) -> Result<Self, SolaceError> {
        let gemini_stage: Option<Arc<dyn Provider>> = GeminiClient::from_config(gemini)?
            .map(|c| Arc::new(c) as Arc<dyn Provider>);
        let openai_stage: Option<Arc<dyn Provider>> = if cascade.use_openai_fallback {
            OpenAiClient::from_config(openai)?.map(|c| Arc::new(c) as Arc<dyn Provider>)
        } else {
            None
        };

        let mut stages = Vec::new();
        if cascade.prefer_gemini {
            stages.extend(gemini_stage);
            stages.extend(openai_stage);
        } else {
            stages.extend(openai_stage);
            stages.extend(gemini_stage);
        }
        Ok(Self::with_stages(stages, cascade))
    }

    /// Assemble from explicit stages. The primary entry point for tests.
    pub fn with_stages(stages: Vec<Arc<dyn Provider>>, config: &CascadeConfig) -> Self {
        Self {
            stages,
            builtin: BuiltinResponder::new(),
            attempt_timeout: Duration::from_secs(config.request_timeout_secs),
            cooldown: Duration::from_secs(config.cooldown_secs),
            cooling: DashMap::new(),
        }
    }

    /// Which provider kinds are configured, in attempt order. The builtin
    /// terminal stage is always last.
    pub fn stage_order(&self) -> Vec<ProviderKind> {
        let mut order: Vec<ProviderKind> = self.stages.iter().map(|s| s.kind()).collect();
        order.push(ProviderKind::Builtin);
        order
    }

    /// Resolve one reply. Never fails: the worst case is a builtin template.
    pub async fn generate(
        &self,
        prompt: &str,
        features: &NlpFeatures,
        style: ResponseStyle,
    ) -> ResponseCandidate {
        for stage in &self.stages {
            let kind = stage.kind();
            if self.in_cooldown(kind) {
                debug!(provider = %kind, "stage in cooldown, skipped");
                continue;
            }

            let start = Instant::now();
            match tokio::time::timeout(self.attempt_timeout, stage.send(prompt, self.attempt_timeout))
                .await
            {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    let latency = start.elapsed();
                    info!(provider = %kind, latency_ms = latency.as_millis() as u64, "reply served");
                    return ResponseCandidate {
                        text: finalize_reply(&text),
                        provider: kind,
                        latency,
                    };
                }
                Ok(Ok(_)) => {
                    warn!(provider = %kind, "stage returned empty text, advancing");
                }
                Ok(Err(e)) => {
                    warn!(provider = %kind, error = %e, "stage failed, advancing");
                }
                Err(_) => {
                    warn!(provider = %kind, timeout = ?self.attempt_timeout, "stage timed out, advancing");
                }
            }
            self.cooling.insert(kind, Instant::now());
        }

        let start = Instant::now();
        let text = self.builtin.respond(features, style);
        info!(provider = %ProviderKind::Builtin, "reply served");
        ResponseCandidate {
            text,
            provider: ProviderKind::Builtin,
            latency: start.elapsed(),
        }
    }

    fn in_cooldown(&self, kind: ProviderKind) -> bool {
        if let Some(entry) = self.cooling.get(&kind) {
            if entry.elapsed() < self.cooldown {
                return true;
            }
        }
        self.cooling.remove(&kind);
        false
    }
}
