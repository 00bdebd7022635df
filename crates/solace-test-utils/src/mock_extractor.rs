// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock feature extractor for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use solace_core::{FeatureExtractor, NlpFeatures, SolaceError};

/// One scripted extractor behavior.
#[derive(Debug, Clone)]
pub enum ExtractorOutcome {
    /// Return these features.
    Features(NlpFeatures),
    /// Fail with an internal error.
    Fail,
    /// Never complete. The caller's timeout is the only way out.
    Hang,
}

/// A mock extractor that plays back a scripted sequence of outcomes,
/// returning neutral features once the script runs out.
pub struct MockExtractor {
    script: Arc<Mutex<VecDeque<ExtractorOutcome>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::with_script(Vec::new())
    }

    pub fn with_script(script: Vec<ExtractorOutcome>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(script))),
        }
    }

    pub async fn push(&self, outcome: ExtractorOutcome) {
        self.script.lock().await.push_back(outcome);
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureExtractor for MockExtractor {
    async fn analyze(&self, _text: &str) -> Result<NlpFeatures, SolaceError> {
        let outcome = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| ExtractorOutcome::Features(NlpFeatures::neutral()));
        match outcome {
            ExtractorOutcome::Features(features) => Ok(features),
            ExtractorOutcome::Fail => Err(SolaceError::Internal("scripted extractor failure".into())),
            ExtractorOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(SolaceError::Internal("unreachable: hang completed".into()))
            }
        }
    }
}
