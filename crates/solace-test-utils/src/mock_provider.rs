// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider for deterministic testing.
//!
//! Outcomes are popped from a FIFO queue, so a test scripts the exact
//! sequence of provider behaviors it wants to exercise. When the queue is
//! empty, a default reply is returned.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use solace_core::{Provider, ProviderKind, SolaceError};

/// One scripted provider behavior.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this text.
    Reply(String),
    /// Fail with a provider error carrying this message.
    Fail(String),
    /// Never complete. The caller's timeout is the only way out.
    Hang,
}

/// A mock provider that plays back a scripted sequence of outcomes.
pub struct MockProvider {
    kind: ProviderKind,
    script: Arc<Mutex<VecDeque<MockOutcome>>>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a mock with an empty script; every call returns the default
    /// reply.
    pub fn new(kind: ProviderKind) -> Self {
        Self::with_script(kind, Vec::new())
    }

    /// Create a mock pre-loaded with outcomes.
    pub fn with_script(kind: ProviderKind, script: Vec<MockOutcome>) -> Self {
        Self {
            kind,
            script: Arc::new(Mutex::new(VecDeque::from(script))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Append an outcome to the script.
    pub async fn push(&self, outcome: MockOutcome) {
        self.script.lock().await.push_back(outcome);
    }

    /// Number of times `send` has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn send(&self, _prompt: &str, _timeout: Duration) -> Result<String, SolaceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockOutcome::Reply("mock reply".to_string()));
        match outcome {
            MockOutcome::Reply(text) => Ok(text),
            MockOutcome::Fail(message) => Err(SolaceError::provider(message)),
            MockOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(SolaceError::provider("unreachable: hang completed"))
            }
        }
    }
}
