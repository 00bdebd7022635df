// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Solace workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh random session id.
    pub fn generate() -> Self {
        SessionId(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a message within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn generate() -> Self {
        MessageId(uuid::Uuid::new_v4().to_string())
    }
}

/// Unique identifier for a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn generate() -> Self {
        UserId(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author of a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Which generator produced a reply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    /// Deterministic template stage. Cannot fail; terminal fallback.
    Builtin,
}

/// Severity of a safety classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Safe,
    /// Pass through, but advise the generator toward compassionate,
    /// non-clinical phrasing.
    Sensitive,
    /// Bypass generation entirely; reply with the reserved crisis resources.
    Crisis,
}

/// Why the gate reached its verdict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SafetyRationale {
    /// A curated high-risk keyword matched.
    MatchedKeyword,
    /// A crisis regex pattern matched.
    MatchedPattern,
    /// The model signal (sentiment/emotion extremity) flagged the message.
    ModelFlagged,
    /// Unsafe or out-of-scope content screen matched.
    Screened,
    /// No signal fired.
    Default,
}

/// Classification of a single message. Computed fresh per message,
/// never retroactively recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub severity: Severity,
    pub rationale: SafetyRationale,
}

impl SafetyVerdict {
    pub fn safe() -> Self {
        SafetyVerdict {
            severity: Severity::Safe,
            rationale: SafetyRationale::Default,
        }
    }

    pub fn is_crisis(&self) -> bool {
        self.severity == Severity::Crisis
    }
}

/// User intent categories recognized by the feature extractor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    SeekingInformation,
    EmotionalSupport,
    CopingStrategies,
    ResourcesRequest,
    PersonalStory,
    Crisis,
    PhysicalSymptom,
    General,
}

/// Coarse sentiment polarity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

/// Sentiment signal with classifier confidence (0.0-1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub confidence: f32,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Sentiment {
            label: SentimentLabel::Neutral,
            confidence: 0.5,
        }
    }
}

/// Dominant emotion detected in a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    None,
    Sadness,
    Grief,
    Fear,
    Anger,
    Joy,
}

/// Stateless analysis of one message: intent, sentiment, emotion, plus
/// lightweight text signals. Owned by the message it annotates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NlpFeatures {
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub emotion: Emotion,
    pub keywords: Vec<String>,
    pub is_question: bool,
}

impl NlpFeatures {
    /// Neutral default used for empty input and when the extractor is
    /// unavailable or times out.
    pub fn neutral() -> Self {
        NlpFeatures {
            intent: Intent::General,
            sentiment: Sentiment::neutral(),
            emotion: Emotion::None,
            keywords: Vec::new(),
            is_question: false,
        }
    }
}

/// One recorded edit of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub previous_content: String,
    pub edited_at: DateTime<Utc>,
}

/// A single message in a session.
///
/// Immutable once delivered except through the explicit edit/delete
/// operations, which are themselves recorded here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub edited: bool,
    #[serde(default)]
    pub edit_history: Vec<EditRecord>,
    #[serde(default)]
    pub deleted: bool,
    /// Safety verdict computed when the message arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<SafetyVerdict>,
    /// NLP annotations computed when the message arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<NlpFeatures>,
    /// For assistant messages: which generator produced the text.
    /// Distinguishes crisis/builtin replies from model-origin text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<ProviderKind>,
}

impl Message {
    /// Construct a user message with a fresh id and current timestamp.
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            id: MessageId::generate(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            edited: false,
            edit_history: Vec::new(),
            deleted: false,
            verdict: None,
            features: None,
            origin: None,
        }
    }

    /// Construct an assistant message tagged with its generator.
    pub fn assistant(content: impl Into<String>, origin: ProviderKind) -> Self {
        Message {
            origin: Some(origin),
            role: Role::Assistant,
            ..Message::user(content)
        }
    }
}

/// An ordered conversation owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub deleted: bool,
}

impl Session {
    /// The most recent `n` messages in original order. Deterministic given
    /// the message list and window size; derived on read, never stored.
    pub fn context_window(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

/// Preferred response phrasing, from the user profile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    #[default]
    Neutral,
    Friendly,
    Professional,
}

/// A candidate reply produced during cascade resolution.
///
/// Ephemeral: only the winner is persisted as a [`Message`].
#[derive(Debug, Clone)]
pub struct ResponseCandidate {
    pub text: String,
    pub provider: ProviderKind,
    pub latency: std::time::Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn context_window_returns_last_n_in_order() {
        let mut session = Session {
            id: SessionId::generate(),
            user_id: UserId::generate(),
            title: "t".into(),
            created_at: Utc::now(),
            last_interaction: Utc::now(),
            messages: Vec::new(),
            deleted: false,
        };
        for i in 0..15 {
            session.messages.push(Message::user(format!("m{i}")));
        }
        let window = session.context_window(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "m5");
        assert_eq!(window[9].content, "m14");
    }

    #[test]
    fn context_window_smaller_than_history() {
        let session = Session {
            id: SessionId::generate(),
            user_id: UserId::generate(),
            title: "t".into(),
            created_at: Utc::now(),
            last_interaction: Utc::now(),
            messages: vec![Message::user("only")],
            deleted: false,
        };
        assert_eq!(session.context_window(10).len(), 1);
    }

    #[test]
    fn severity_ordering_supports_strictest_wins() {
        assert!(Severity::Crisis > Severity::Sensitive);
        assert!(Severity::Sensitive > Severity::Safe);
    }

    #[test]
    fn enums_round_trip_through_strings() {
        for intent in [
            Intent::Greeting,
            Intent::EmotionalSupport,
            Intent::Crisis,
            Intent::General,
        ] {
            let s = intent.to_string();
            assert_eq!(Intent::from_str(&s).unwrap(), intent);
        }
        assert_eq!(ProviderKind::Builtin.to_string(), "builtin");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn assistant_message_carries_origin() {
        let msg = Message::assistant("hi", ProviderKind::Gemini);
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.origin, Some(ProviderKind::Gemini));
    }

    #[test]
    fn message_serialization_round_trip() {
        let mut msg = Message::user("I feel low today");
        msg.verdict = Some(SafetyVerdict {
            severity: Severity::Sensitive,
            rationale: SafetyRationale::ModelFlagged,
        });
        msg.features = Some(NlpFeatures::neutral());
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
