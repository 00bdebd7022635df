// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./solace.toml` > `~/.config/solace/solace.toml`
//! > `/etc/solace/solace.toml` with environment variable overrides via the
//! `SOLACE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SolaceConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/solace/solace.toml` (system-wide)
/// 3. `~/.config/solace/solace.toml` (user XDG config)
/// 4. `./solace.toml` (local directory)
/// 5. `SOLACE_*` environment variables
pub fn load_config() -> Result<SolaceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SolaceConfig::default()))
        .merge(Toml::file("/etc/solace/solace.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("solace/solace.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("solace.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SolaceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SolaceConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SolaceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SolaceConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SOLACE_CONVERSATION_CONTEXT_WINDOW`
/// must map to `conversation.context_window`, not `conversation.context.window`.
fn env_provider() -> Env {
    Env::prefixed("SOLACE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("conversation_", "conversation.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("cascade_", "cascade.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("nlp_", "nlp.", 1);
        mapped.into()
    })
}
