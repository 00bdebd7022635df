// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional token revocation.
//!
//! Tokens are stateless-expiry-based by default. Deployments that need
//! server-side logout attach a [`RevocationList`] to the authority; both
//! paths share the same validation interface.

use std::collections::HashSet;
use std::sync::RwLock;

/// A set of revoked tokens consulted before any token is declared valid.
pub trait RevocationList: Send + Sync {
    fn revoke(&self, token: &str);
    fn is_revoked(&self, token: &str) -> bool;
}

/// In-memory revocation list. Cleared on restart, which is acceptable
/// because an ephemeral signing key invalidates old tokens anyway.
#[derive(Default)]
pub struct MemoryRevocationList {
    revoked: RwLock<HashSet<String>>,
}

impl MemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RevocationList for MemoryRevocationList {
    fn revoke(&self, token: &str) {
        // Poisoning only occurs if a writer panicked; propagate by panic
        // is not acceptable here, so recover the inner set.
        let mut set = self.revoked.write().unwrap_or_else(|e| e.into_inner());
        set.insert(token.to_string());
    }

    fn is_revoked(&self, token: &str) -> bool {
        let set = self.revoked.read().unwrap_or_else(|e| e.into_inner());
        set.contains(token)
    }
}
