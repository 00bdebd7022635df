// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic mocks for testing Solace without external services.

pub mod mock_extractor;
pub mod mock_provider;

pub use mock_extractor::{ExtractorOutcome, MockExtractor};
pub use mock_provider::{MockOutcome, MockProvider};
