// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption key resolution.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;
use zeroize::Zeroizing;

use solace_core::StorageError;
use solace_config::model::StorageConfig;

use crate::crypto;

/// Resolve the store key from config, generating an ephemeral key when none
/// is configured. With an ephemeral key, blobs written by a previous process
/// will fail decryption rather than silently disappearing.
pub fn load_or_generate_key(storage: &StorageConfig) -> Result<Zeroizing<[u8; 32]>, StorageError> {
    match &storage.encryption_key {
        Some(encoded) => {
            let bytes = STANDARD
                .decode(encoded)
                .map_err(|_| StorageError::Crypto("encryption_key is not valid base64".into()))?;
            let key: [u8; 32] = bytes.try_into().map_err(|_| {
                StorageError::Crypto("encryption_key must decode to exactly 32 bytes".into())
            })?;
            Ok(Zeroizing::new(key))
        }
        None => {
            debug!("no encryption key configured, generating ephemeral key");
            Ok(Zeroizing::new(crypto::generate_random_key()?))
        }
    }
}
