// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-zero windows and key lengths.

use crate::diagnostic::ConfigError;
use crate::model::SolaceConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or all collected errors
/// (does not fail fast).
pub fn validate_config(config: &SolaceConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.conversation.max_conversation_length == 0 {
        errors.push(ConfigError::Validation {
            message: "conversation.max_conversation_length must be at least 1".to_string(),
        });
    }

    if config.conversation.context_window == 0 {
        errors.push(ConfigError::Validation {
            message: "conversation.context_window must be at least 1".to_string(),
        });
    }

    if config.conversation.context_window > config.conversation.max_conversation_length {
        errors.push(ConfigError::Validation {
            message: format!(
                "conversation.context_window ({}) must not exceed conversation.max_conversation_length ({})",
                config.conversation.context_window, config.conversation.max_conversation_length
            ),
        });
    }

    if config.conversation.session_expiry_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "conversation.session_expiry_minutes must be at least 1".to_string(),
        });
    }

    if config.auth.token_expiry_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "auth.token_expiry_hours must be at least 1".to_string(),
        });
    }

    if config.auth.key_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "auth.key_id must not be empty".to_string(),
        });
    }

    if config.storage.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    if config.cascade.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "cascade.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if !(0.0..=1.0).contains(&config.nlp.emotion_threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "nlp.emotion_threshold must be within 0.0..=1.0, got {}",
                config.nlp.emotion_threshold
            ),
        });
    }

    if !(0.0..=1.0).contains(&config.nlp.sentiment_threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "nlp.sentiment_threshold must be within 0.0..=1.0, got {}",
                config.nlp.sentiment_threshold
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
