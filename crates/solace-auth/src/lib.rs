// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for Solace.
//!
//! Signed session tokens ([`TokenAuthority`]), optional server-side
//! revocation ([`RevocationList`]), and account records with Argon2id
//! password hashing ([`UserRecord`]).

pub mod password;
pub mod revocation;
pub mod token;
pub mod user;

pub use revocation::{MemoryRevocationList, RevocationList};
pub use token::TokenAuthority;
pub use user::{UserProfile, UserRecord};
