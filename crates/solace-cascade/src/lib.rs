// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response generation for Solace.
//!
//! A configurable cascade of model providers (Gemini, OpenAI) with a
//! deterministic builtin terminal stage, plus the prompt rendering shared
//! by every model-backed attempt.

pub mod builtin;
pub mod cascade;
pub mod gemini;
pub mod openai;
pub mod prompt;

pub use builtin::BuiltinResponder;
pub use cascade::Cascade;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use prompt::render_prompt;
