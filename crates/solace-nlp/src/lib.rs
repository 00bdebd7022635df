// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feature extraction for Solace.
//!
//! Two extractors share one output shape ([`solace_core::NlpFeatures`]):
//! [`RuleBasedExtractor`] is pure keyword analysis with no I/O, and
//! [`HfApiExtractor`] layers Hugging Face classifier output on top of the
//! same rules, falling back to them whenever the API misbehaves.

pub mod hf;
pub mod rules;

pub use hf::HfApiExtractor;
pub use rules::RuleBasedExtractor;

use std::sync::Arc;

use solace_core::{FeatureExtractor, SolaceError};
use solace_config::model::NlpConfig;

/// Build the configured extractor: model-backed when an API key is present,
/// rule-based otherwise.
pub fn extractor_from_config(config: &NlpConfig) -> Result<Arc<dyn FeatureExtractor>, SolaceError> {
    Ok(match HfApiExtractor::from_config(config)? {
        Some(api) => Arc::new(api),
        None => Arc::new(RuleBasedExtractor::new()),
    })
}
