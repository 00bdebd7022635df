// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestrator.
//!
//! [`ChatEngine`] wires the token authority, encrypted stores, safety gate,
//! feature extractor, and provider cascade into the message pipeline:
//! authenticate, load or create the session, gate, then either serve the
//! reserved safety reply or extract features and run the cascade. The user
//! message and the reply are appended together so no interleaving can split
//! an exchange, and nothing holds a session lock while a provider call is
//! in flight.

mod engine;

pub use engine::{ChatEngine, ChatReply};
