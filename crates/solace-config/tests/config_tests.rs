// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Solace configuration system.

use solace_config::{load_and_validate_str, load_config_from_str, ConfigError};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_solace_config() {
    let toml = r#"
[conversation]
session_expiry_minutes = 15
max_conversation_length = 50
context_window = 8
max_message_chars = 2000

[auth]
token_expiry_hours = 12
refresh_grace_minutes = 10
signing_key = "super-secret"
key_id = "k2"

[storage]
data_dir = "/tmp/solace-test"

[cascade]
prefer_gemini = false
use_openai_fallback = false
request_timeout_secs = 5
cooldown_secs = 60

[gemini]
api_key = "gm-123"
model = "gemini-2.0-flash"

[openai]
api_key = "sk-123"
model = "gpt-4o-mini"
max_tokens = 120

[nlp]
timeout_ms = 800
emotion_threshold = 0.7
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.conversation.session_expiry_minutes, 15);
    assert_eq!(config.conversation.max_conversation_length, 50);
    assert_eq!(config.conversation.context_window, 8);
    assert_eq!(config.auth.token_expiry_hours, 12);
    assert_eq!(config.auth.key_id, "k2");
    assert_eq!(config.auth.signing_key.as_deref(), Some("super-secret"));
    assert_eq!(config.storage.data_dir, "/tmp/solace-test");
    assert!(!config.cascade.prefer_gemini);
    assert!(!config.cascade.use_openai_fallback);
    assert_eq!(config.gemini.api_key.as_deref(), Some("gm-123"));
    assert_eq!(config.openai.max_tokens, 120);
    assert_eq!(config.nlp.timeout_ms, 800);
}

/// Missing sections fall back to documented defaults; absence is never an error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.conversation.session_expiry_minutes, 30);
    assert_eq!(config.conversation.max_conversation_length, 100);
    assert_eq!(config.conversation.context_window, 10);
    assert_eq!(config.auth.token_expiry_hours, 24);
    assert!(config.cascade.prefer_gemini);
    assert!(config.cascade.use_openai_fallback);
    assert!(config.gemini.api_key.is_none());
    assert!(config.openai.api_key.is_none());
    assert_eq!(config.gemini.model, "gemini-2.0-flash");
    assert_eq!(config.openai.model, "gpt-4o-mini");
}

/// Unknown keys are rejected at parse time.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[conversation]
contxt_window = 10
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("contxt_window"),
        "error should mention the bad key, got: {err_str}"
    );
}

/// A typo'd key surfaces as a diagnostic carrying a correction.
#[test]
fn typo_key_gets_a_did_you_mean_suggestion() {
    let toml = r#"
[conversation]
contxt_window = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "context_window"
    )));
}

/// Semantic validation runs after deserialization.
#[test]
fn semantically_invalid_config_fails_validation() {
    let toml = r#"
[conversation]
context_window = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("context_window")));
}

/// Defaults pass the full load-and-validate path.
#[test]
fn defaults_pass_validation() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.conversation.context_window, 10);
}
