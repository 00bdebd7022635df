// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open for on-disk blobs.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the
//! system CSPRNG; nonce reuse would be catastrophic for GCM security. The
//! nonce is prepended to the ciphertext so a blob is self-contained:
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

use solace_core::StorageError;

const NONCE_LEN: usize = 12;

/// Encrypt plaintext into a self-contained blob.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, StorageError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| StorageError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| StorageError::Crypto("failed to generate random nonce".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: the buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| StorageError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + in_out.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&in_out);
    Ok(blob)
}

/// Decrypt a blob produced by [`seal`].
///
/// Any authentication failure, wrong key, flipped bit, or truncation, is
/// reported as [`StorageError::Decryption`] and must surface to the caller.
pub fn open(key: &[u8; 32], blob: &[u8]) -> Result<Vec<u8>, StorageError> {
    if blob.len() < NONCE_LEN {
        return Err(StorageError::Decryption);
    }
    let unbound =
        UnboundKey::new(&AES_256_GCM, key).map_err(|_| StorageError::Decryption)?;
    let less_safe = LessSafeKey::new(unbound);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&blob[..NONCE_LEN]);
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut in_out = blob[NONCE_LEN..].to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| StorageError::Decryption)?;

    Ok(plaintext.to_vec())
}

/// Generate a random 32-byte key suitable for AES-256-GCM.
pub fn generate_random_key() -> Result<[u8; 32], StorageError> {
    let rng = SystemRandom::new();
    let mut key = [0u8; 32];
    rng.fill(&mut key)
        .map_err(|_| StorageError::Crypto("failed to generate random key".to_string()))?;
    Ok(key)
}
