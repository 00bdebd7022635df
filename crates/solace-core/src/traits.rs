// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits at the system's seams.
//!
//! Remote LLM providers and the NLP classifier are external collaborators;
//! everything behind these traits can be swapped for mocks in tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::types::{NlpFeatures, ProviderKind};

/// A response-generation backend the cascade can try.
///
/// Implementations wrap one remote API (or the builtin templates) behind a
/// uniform `send` so the cascade stays agnostic to provider identity. Each
/// call is independent: a failure must not corrupt later requests.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Which backend this is, for logging and candidate tagging.
    fn kind(&self) -> ProviderKind;

    /// Send a fully rendered prompt and return the reply text.
    ///
    /// Implementations must respect `timeout` as an upper bound on the
    /// whole attempt and must return an error (never hang) past it.
    async fn send(&self, prompt: &str, timeout: Duration) -> Result<String, SolaceError>;
}

/// Stateless analysis of a message: intent, sentiment, emotion.
///
/// The concrete classifier is a capability boundary. Implementations must
/// tolerate empty/whitespace input by returning [`NlpFeatures::neutral`]
/// rather than failing; callers apply a timeout and fall back to neutral
/// defaults so this step never blocks the crisis-escalation path.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<NlpFeatures, SolaceError>;
}
