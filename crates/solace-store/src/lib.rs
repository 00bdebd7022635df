// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted at-rest persistence for Solace.
//!
//! Sessions and account records are stored as individual AES-256-GCM sealed
//! blobs. Plaintext never touches disk; decryption failures surface as
//! [`solace_core::StorageError::Decryption`] instead of being treated as
//! missing data.

pub mod crypto;
pub mod keys;
pub mod session;
pub mod users;

pub use session::{SessionStore, SessionSummary};
pub use users::UserStore;
