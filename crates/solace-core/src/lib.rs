// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Solace conversation backend.
//!
//! Provides the error taxonomy, shared data model, and the capability
//! traits (`Provider`, `FeatureExtractor`) implemented by the provider and
//! NLP crates and mocked in tests.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AuthError, SolaceError, StorageError};
pub use traits::{FeatureExtractor, Provider};
pub use types::{
    EditRecord, Emotion, Intent, Message, MessageId, NlpFeatures, ProviderKind,
    ResponseCandidate, ResponseStyle, Role, SafetyRationale, SafetyVerdict, Sentiment,
    SentimentLabel, Session, SessionId, Severity, UserId,
};
