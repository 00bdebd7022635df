// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Solace backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Every value has a compiled default; absence of a
//! value always means "use the default", never an error.

use serde::{Deserialize, Serialize};

/// Top-level Solace configuration.
///
/// Loaded from TOML files with environment variable overrides
/// (`SOLACE_` prefix). All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SolaceConfig {
    /// Conversation limits and windows.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Token issuance and password settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Encrypted session store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Provider cascade ordering and timeouts.
    #[serde(default)]
    pub cascade: CascadeConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OpenAI API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// NLP feature extractor settings.
    #[serde(default)]
    pub nlp: NlpConfig,
}

/// Conversation limits and windows.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationConfig {
    /// Idle minutes after which a session is treated as expired.
    #[serde(default = "default_session_expiry_minutes")]
    pub session_expiry_minutes: u64,

    /// Maximum messages retained per session; oldest are evicted first.
    #[serde(default = "default_max_conversation_length")]
    pub max_conversation_length: usize,

    /// Number of recent messages supplied to generation.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Maximum characters accepted in a single inbound message.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            session_expiry_minutes: default_session_expiry_minutes(),
            max_conversation_length: default_max_conversation_length(),
            context_window: default_context_window(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

fn default_session_expiry_minutes() -> u64 {
    30
}

fn default_max_conversation_length() -> usize {
    100
}

fn default_context_window() -> usize {
    10
}

fn default_max_message_chars() -> usize {
    4000
}

/// Token issuance and password settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Hours a freshly issued token remains valid.
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: u64,

    /// Minutes past expiry during which `refresh` still accepts a token.
    #[serde(default = "default_refresh_grace_minutes")]
    pub refresh_grace_minutes: u64,

    /// Token signing secret. `None` generates an ephemeral per-process
    /// secret (tokens do not survive restart).
    #[serde(default)]
    pub signing_key: Option<String>,

    /// Identifier of the current signing key, embedded in tokens so that
    /// tokens from a rotated-out key are rejected as unknown.
    #[serde(default = "default_key_id")]
    pub key_id: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_expiry_hours: default_token_expiry_hours(),
            refresh_grace_minutes: default_refresh_grace_minutes(),
            signing_key: None,
            key_id: default_key_id(),
        }
    }
}

fn default_token_expiry_hours() -> u64 {
    24
}

fn default_refresh_grace_minutes() -> u64 {
    5
}

fn default_key_id() -> String {
    "k1".to_string()
}

/// Encrypted session store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding encrypted session and user blobs.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Base64-encoded 32-byte AES-256-GCM key. `None` generates an
    /// ephemeral per-process key (stored history is unreadable after
    /// restart; intended for development only).
    #[serde(default)]
    pub encryption_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            encryption_key: None,
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("solace"))
        .unwrap_or_else(|| std::path::PathBuf::from("solace-data"))
        .to_string_lossy()
        .into_owned()
}

/// Provider cascade ordering and timeouts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CascadeConfig {
    /// Try Gemini before OpenAI when true.
    #[serde(default = "default_prefer_gemini")]
    pub prefer_gemini: bool,

    /// When false, the OpenAI stage is skipped entirely.
    #[serde(default = "default_use_openai_fallback")]
    pub use_openai_fallback: bool,

    /// Upper bound in seconds for a single provider attempt.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Seconds a provider is skipped after a failed attempt.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            prefer_gemini: default_prefer_gemini(),
            use_openai_fallback: default_use_openai_fallback(),
            request_timeout_secs: default_request_timeout_secs(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

fn default_prefer_gemini() -> bool {
    true
}

fn default_use_openai_fallback() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    12
}

fn default_cooldown_secs() -> u64 {
    30
}

/// Gemini API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` disables the Gemini stage.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier used for generation.
    #[serde(default = "default_gemini_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// OpenAI API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` disables the OpenAI stage.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier used for generation.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_openai_max_tokens")]
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            max_tokens: default_openai_max_tokens(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_max_tokens() -> u32 {
    150
}

/// NLP feature extractor settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NlpConfig {
    /// Hugging Face inference API key. `None` keeps the rule-based path only.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound in milliseconds for one extractor call before callers
    /// proceed with neutral defaults.
    #[serde(default = "default_nlp_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum classifier score to accept a model emotion label.
    #[serde(default = "default_emotion_threshold")]
    pub emotion_threshold: f32,

    /// Minimum classifier score to accept a model sentiment label.
    #[serde(default = "default_sentiment_threshold")]
    pub sentiment_threshold: f32,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_ms: default_nlp_timeout_ms(),
            emotion_threshold: default_emotion_threshold(),
            sentiment_threshold: default_sentiment_threshold(),
        }
    }
}

fn default_nlp_timeout_ms() -> u64 {
    1500
}

fn default_emotion_threshold() -> f32 {
    0.6
}

fn default_sentiment_threshold() -> f32 {
    0.4
}
