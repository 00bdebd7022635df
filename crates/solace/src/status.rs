// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operational subcommands: configuration summary and data sweeps.

use solace_config::SolaceConfig;
use solace_core::SolaceError;
use solace_engine::ChatEngine;

/// Print the effective configuration. Secrets are reported as set or
/// unset, never echoed.
pub fn run(config: &SolaceConfig) -> Result<(), SolaceError> {
    println!("data dir:            {}", config.storage.data_dir);
    println!(
        "encryption key:      {}",
        set_or_ephemeral(config.storage.encryption_key.is_some())
    );
    println!(
        "signing key:         {}",
        set_or_ephemeral(config.auth.signing_key.is_some())
    );
    println!("token expiry:        {}h", config.auth.token_expiry_hours);
    println!(
        "session expiry:      {}m",
        config.conversation.session_expiry_minutes
    );
    println!(
        "history limit:       {} messages",
        config.conversation.max_conversation_length
    );
    println!(
        "context window:      {} messages",
        config.conversation.context_window
    );
    println!(
        "gemini:              {} ({})",
        enabled(config.gemini.api_key.is_some()),
        config.gemini.model
    );
    let openai_on = config.openai.api_key.is_some() && config.cascade.use_openai_fallback;
    println!(
        "openai fallback:     {} ({})",
        enabled(openai_on),
        config.openai.model
    );
    println!(
        "nlp models:          {}",
        if config.nlp.api_key.is_some() {
            "hugging face + rules"
        } else {
            "rules only"
        }
    );
    println!(
        "request timeout:     {}s, cooldown {}s",
        config.cascade.request_timeout_secs, config.cascade.cooldown_secs
    );
    Ok(())
}

/// Remove expired and soft-deleted session blobs.
pub fn sweep(config: SolaceConfig) -> Result<(), SolaceError> {
    let engine = ChatEngine::from_config(config)?;
    let removed = engine.sweep_expired()?;
    println!("removed {removed} session file(s)");
    Ok(())
}

fn set_or_ephemeral(set: bool) -> &'static str {
    if set { "set" } else { "ephemeral (dev only)" }
}

fn enabled(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled" }
}
