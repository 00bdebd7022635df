// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted account persistence.
//!
//! One sealed blob per account under `users/`, same blob format as the
//! session store. Username lookup scans the directory; account counts are
//! small enough that an index is not worth the consistency burden.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use solace_auth::UserRecord;
use solace_core::{StorageError, UserId};
use solace_config::model::StorageConfig;

use crate::crypto;
use crate::keys::load_or_generate_key;

/// Encrypted at-rest account store.
pub struct UserStore {
    users_dir: PathBuf,
    key: Zeroizing<[u8; 32]>,
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("users_dir", &self.users_dir)
            .field("key", &"[redacted]")
            .finish()
    }
}

impl UserStore {
    pub fn open(storage: &StorageConfig) -> Result<Self, StorageError> {
        let users_dir = Path::new(&storage.data_dir).join("users");
        fs::create_dir_all(&users_dir)?;
        let key = load_or_generate_key(storage)?;
        Ok(Self { users_dir, key })
    }

    /// Persist an account record, replacing any existing blob for the same id.
    pub fn save_user(&self, user: &UserRecord) -> Result<(), StorageError> {
        let plaintext = serde_json::to_vec(user)?;
        let blob = crypto::seal(&self.key, &plaintext)?;
        let path = self.blob_path(&user.user_id);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &blob)?;
        fs::rename(&tmp, &path)?;
        debug!(user_id = %user.user_id, "user record saved");
        Ok(())
    }

    pub fn load_user(&self, id: &UserId) -> Result<UserRecord, StorageError> {
        let blob = match fs::read(self.blob_path(id)) {
            Ok(blob) => blob,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::UserNotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let plaintext = crypto::open(&self.key, &blob)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }

    /// Find an account by username. Returns `Ok(None)` when no account
    /// matches; decryption failures still surface.
    pub fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        for entry in fs::read_dir(&self.users_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("bin") {
                continue;
            }
            let blob = fs::read(&path)?;
            let plaintext = crypto::open(&self.key, &blob)?;
            let user: UserRecord = serde_json::from_slice(&plaintext)?;
            if user.username == username {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    fn blob_path(&self, id: &UserId) -> PathBuf {
        self.users_dir.join(format!("{id}.bin"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(dir: &Path) -> UserStore {
        let storage = StorageConfig {
            data_dir: dir.to_string_lossy().into_owned(),
            encryption_key: None,
        };
        UserStore::open(&storage).unwrap()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let user = UserRecord::register("ada", Some("ada@example.com".into()), "strong-password")
            .unwrap();

        store.save_user(&user).unwrap();
        let loaded = store.load_user(&user.user_id).unwrap();
        assert_eq!(loaded.username, "ada");
        assert_eq!(loaded.password_hash, user.password_hash);
    }

    #[test]
    fn find_by_username_scopes_correctly() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let ada = UserRecord::register("ada", None, "strong-password").unwrap();
        let ben = UserRecord::register("ben", None, "strong-password").unwrap();
        store.save_user(&ada).unwrap();
        store.save_user(&ben).unwrap();

        let found = store.find_by_username("ben").unwrap().unwrap();
        assert_eq!(found.user_id, ben.user_id);
        assert!(store.find_by_username("carol").unwrap().is_none());
    }

    #[test]
    fn save_replaces_existing_record() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let mut user = UserRecord::register("ada", None, "strong-password").unwrap();
        store.save_user(&user).unwrap();

        user.consent_given = true;
        user.record_login();
        store.save_user(&user).unwrap();

        let loaded = store.load_user(&user.user_id).unwrap();
        assert!(loaded.consent_given);
        assert!(loaded.last_login.is_some());
    }
}
