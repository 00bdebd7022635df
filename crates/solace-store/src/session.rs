// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted file-per-session store.
//!
//! Each session is one AES-256-GCM sealed blob on disk. Reads decrypt the
//! whole blob, so a reader always sees a consistent snapshot and never a
//! half-written conversation. Writers to the same session are serialized
//! through a per-session async lock; writers to different sessions never
//! contend. Expiry is lazy: an idle session is detected and removed on the
//! next access rather than by a background timer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use zeroize::Zeroizing;

use solace_core::{
    EditRecord, Message, Role, Session, SessionId, StorageError, UserId,
};
use solace_config::model::{ConversationConfig, StorageConfig};

use crate::crypto;
use crate::keys::load_or_generate_key;

const DEFAULT_TITLE: &str = "New conversation";
const TITLE_MAX_CHARS: usize = 40;

/// Listing entry for a user's sessions. Carries no message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
    pub message_count: usize,
}

/// Encrypted at-rest session store.
pub struct SessionStore {
    sessions_dir: PathBuf,
    key: Zeroizing<[u8; 32]>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    expiry: Duration,
    max_len: usize,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions_dir", &self.sessions_dir)
            .field("key", &"[redacted]")
            .field("expiry", &self.expiry)
            .field("max_len", &self.max_len)
            .finish()
    }
}

impl SessionStore {
    /// Open (creating directories as needed) the store under the configured
    /// data directory.
    pub fn open(
        storage: &StorageConfig,
        conversation: &ConversationConfig,
    ) -> Result<Self, StorageError> {
        let sessions_dir = Path::new(&storage.data_dir).join("sessions");
        fs::create_dir_all(&sessions_dir)?;
        let key = load_or_generate_key(storage)?;
        info!(dir = %sessions_dir.display(), "session store opened");
        Ok(Self {
            sessions_dir,
            key,
            locks: DashMap::new(),
            expiry: Duration::minutes(conversation.session_expiry_minutes as i64),
            max_len: conversation.max_conversation_length,
        })
    }

    /// Create and persist a fresh, empty session owned by `user_id`.
    pub fn create_session(&self, user_id: &UserId) -> Result<Session, StorageError> {
        let now = Utc::now();
        let session = Session {
            id: SessionId::generate(),
            user_id: user_id.clone(),
            title: DEFAULT_TITLE.to_string(),
            created_at: now,
            last_interaction: now,
            messages: Vec::new(),
            deleted: false,
        };
        self.write_blob(&session)?;
        debug!(session_id = %session.id, "session created");
        Ok(session)
    }

    /// Load a live session. Deleted and expired sessions read as not found;
    /// an expired session's blob is removed on the way out.
    pub fn get_session(&self, id: &SessionId) -> Result<Session, StorageError> {
        let session = self.read_blob(id)?;
        if session.deleted {
            return Err(StorageError::SessionNotFound(id.to_string()));
        }
        if self.is_expired(&session) {
            debug!(session_id = %id, "expired session removed on access");
            // A concurrent reader may have removed the blob first.
            match fs::remove_file(self.blob_path(id)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            return Err(StorageError::SessionNotFound(id.to_string()));
        }
        Ok(session)
    }

    /// Append one or more messages to a session as a single atomic write.
    ///
    /// An exchange (user message plus reply) passed together can never be
    /// split by a concurrent writer. Oldest messages are evicted first once
    /// the retention limit is reached. Returns the updated session.
    pub async fn append_messages(
        &self,
        id: &SessionId,
        messages: Vec<Message>,
    ) -> Result<Session, StorageError> {
        let lock = self.writer_lock(id);
        let _guard = lock.lock().await;

        let mut session = self.get_session(id)?;
        for message in messages {
            if session.title == DEFAULT_TITLE && message.role == Role::User {
                session.title = derive_title(&message.content);
            }
            while session.messages.len() >= self.max_len {
                session.messages.remove(0);
            }
            session.messages.push(message);
        }
        session.last_interaction = Utc::now();
        self.write_blob(&session)?;
        Ok(session)
    }

    /// Replace a retained message's content, recording the prior content.
    ///
    /// A message that was evicted (or never existed) reads as not found and
    /// the session is left untouched.
    pub async fn edit_message(
        &self,
        id: &SessionId,
        message_id: &solace_core::MessageId,
        new_content: impl Into<String>,
    ) -> Result<Session, StorageError> {
        let lock = self.writer_lock(id);
        let _guard = lock.lock().await;

        let mut session = self.get_session(id)?;
        let message = session
            .messages
            .iter_mut()
            .find(|m| &m.id == message_id && !m.deleted)
            .ok_or_else(|| StorageError::MessageNotFound(message_id.0.clone()))?;

        let new_content = new_content.into();
        message.edit_history.push(EditRecord {
            previous_content: std::mem::replace(&mut message.content, new_content),
            edited_at: Utc::now(),
        });
        message.edited = true;
        session.last_interaction = Utc::now();
        self.write_blob(&session)?;
        Ok(session)
    }

    /// Soft-delete a message: content is cleared, the tombstone keeps its
    /// place in the ordering.
    pub async fn delete_message(
        &self,
        id: &SessionId,
        message_id: &solace_core::MessageId,
    ) -> Result<Session, StorageError> {
        let lock = self.writer_lock(id);
        let _guard = lock.lock().await;

        let mut session = self.get_session(id)?;
        let message = session
            .messages
            .iter_mut()
            .find(|m| &m.id == message_id && !m.deleted)
            .ok_or_else(|| StorageError::MessageNotFound(message_id.0.clone()))?;

        message.content.clear();
        message.deleted = true;
        session.last_interaction = Utc::now();
        self.write_blob(&session)?;
        Ok(session)
    }

    /// Rename a session. Renamed titles are never overwritten by the
    /// first-message auto-title.
    pub async fn rename_session(
        &self,
        id: &SessionId,
        title: impl Into<String>,
    ) -> Result<Session, StorageError> {
        let lock = self.writer_lock(id);
        let _guard = lock.lock().await;

        let mut session = self.get_session(id)?;
        session.title = title.into();
        self.write_blob(&session)?;
        Ok(session)
    }

    /// Soft-delete a session. Subsequent reads see it as not found; the
    /// blob is physically removed by [`SessionStore::sweep_expired`].
    pub async fn delete_session(&self, id: &SessionId) -> Result<(), StorageError> {
        let lock = self.writer_lock(id);
        let _guard = lock.lock().await;

        let mut session = self.read_blob(id)?;
        session.deleted = true;
        self.write_blob(&session)?;
        debug!(session_id = %id, "session soft-deleted");
        Ok(())
    }

    /// List a user's live sessions, most recently active first.
    pub fn list_for_user(&self, user_id: &UserId) -> Result<Vec<SessionSummary>, StorageError> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.sessions_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("bin") {
                continue;
            }
            let blob = fs::read(&path)?;
            let plaintext = crypto::open(&self.key, &blob)?;
            let session: Session = serde_json::from_slice(&plaintext)?;
            if session.deleted || self.is_expired(&session) || &session.user_id != user_id {
                continue;
            }
            summaries.push(SessionSummary {
                id: session.id,
                title: session.title,
                created_at: session.created_at,
                last_interaction: session.last_interaction,
                message_count: session.messages.iter().filter(|m| !m.deleted).count(),
            });
        }
        summaries.sort_by(|a, b| b.last_interaction.cmp(&a.last_interaction));
        Ok(summaries)
    }

    /// Remove blobs for expired and soft-deleted sessions. Returns the
    /// number of blobs removed.
    pub fn sweep_expired(&self) -> Result<usize, StorageError> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.sessions_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("bin") {
                continue;
            }
            let blob = fs::read(&path)?;
            let plaintext = crypto::open(&self.key, &blob)?;
            let session: Session = serde_json::from_slice(&plaintext)?;
            if session.deleted || self.is_expired(&session) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, "swept expired sessions");
        }
        Ok(removed)
    }

    fn is_expired(&self, session: &Session) -> bool {
        Utc::now() - session.last_interaction > self.expiry
    }

    fn writer_lock(&self, id: &SessionId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id.0.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn blob_path(&self, id: &SessionId) -> PathBuf {
        self.sessions_dir.join(format!("{id}.bin"))
    }

    fn read_blob(&self, id: &SessionId) -> Result<Session, StorageError> {
        let blob = match fs::read(self.blob_path(id)) {
            Ok(blob) => blob,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::SessionNotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let plaintext = crypto::open(&self.key, &blob)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }

    fn write_blob(&self, session: &Session) -> Result<(), StorageError> {
        let plaintext = serde_json::to_vec(session)?;
        let blob = crypto::seal(&self.key, &plaintext)?;
        // Write-then-rename keeps a crash from leaving a torn blob behind.
        let path = self.blob_path(&session.id);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &blob)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Derive a session title from the first user message: the leading words,
/// truncated at a word boundary.
fn derive_title(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
    let cut = head.rfind(' ').unwrap_or(head.len());
    format!("{}...", &head[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(dir: &Path) -> SessionStore {
        let storage = StorageConfig {
            data_dir: dir.to_string_lossy().into_owned(),
            encryption_key: None,
        };
        SessionStore::open(&storage, &ConversationConfig::default()).unwrap()
    }

    fn store_with_limits(dir: &Path, max_len: usize, expiry_minutes: u64) -> SessionStore {
        let storage = StorageConfig {
            data_dir: dir.to_string_lossy().into_owned(),
            encryption_key: None,
        };
        let conversation = ConversationConfig {
            max_conversation_length: max_len,
            session_expiry_minutes: expiry_minutes,
            ..ConversationConfig::default()
        };
        SessionStore::open(&storage, &conversation).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let user = UserId::generate();

        let created = store.create_session(&user).unwrap();
        let loaded = store.get_session(&created.id).unwrap();
        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.user_id, user);
        assert!(loaded.messages.is_empty());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let missing = SessionId::generate();
        assert!(matches!(
            store.get_session(&missing),
            Err(StorageError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn append_persists_unicode_content() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();

        let text = "Tenía un día difícil 😔 — こころ";
        store
            .append_messages(&session.id, vec![Message::user(text)])
            .await
            .unwrap();

        let loaded = store.get_session(&session.id).unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.messages[0].content, text);
    }

    #[tokio::test]
    async fn title_derives_from_first_user_message() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();
        assert_eq!(session.title, DEFAULT_TITLE);

        let updated = store
            .append_messages(&session.id, vec![Message::user("I keep waking up at night")])
            .await
            .unwrap();
        assert_eq!(updated.title, "I keep waking up at night");

        // Later messages do not retitle.
        let updated = store
            .append_messages(&session.id, vec![Message::user("still happening")])
            .await
            .unwrap();
        assert_eq!(updated.title, "I keep waking up at night");
    }

    #[tokio::test]
    async fn long_first_message_truncates_title_at_word_boundary() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();

        let updated = store
            .append_messages(
                &session.id,
                vec![Message::user(
                    "I have been feeling anxious about work deadlines and everything else lately",
                )],
            )
            .await
            .unwrap();
        assert!(updated.title.ends_with("..."));
        assert!(updated.title.chars().count() <= TITLE_MAX_CHARS + 3);
    }

    #[tokio::test]
    async fn fifo_eviction_drops_oldest_first() {
        let dir = tempdir().unwrap();
        let store = store_with_limits(dir.path(), 4, 30);
        let session = store.create_session(&UserId::generate()).unwrap();

        for i in 0..6 {
            store
                .append_messages(&session.id, vec![Message::user(format!("m{i}"))])
                .await
                .unwrap();
        }

        let loaded = store.get_session(&session.id).unwrap();
        assert_eq!(loaded.messages.len(), 4);
        let contents: Vec<_> = loaded.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["m2", "m3", "m4", "m5"]);
    }

    #[tokio::test]
    async fn concurrent_appends_to_one_session_both_persist() {
        let dir = tempdir().unwrap();
        let store = Arc::new(store_at(dir.path()));
        let session = store.create_session(&UserId::generate()).unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            let id = session.id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append_messages(&id, vec![Message::user(format!("c{i}"))])
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let loaded = store.get_session(&session.id).unwrap();
        assert_eq!(loaded.messages.len(), 8);
    }

    #[tokio::test]
    async fn exchange_appends_atomically() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();

        store
            .append_messages(
                &session.id,
                vec![
                    Message::user("hello"),
                    Message::assistant("hi there", solace_core::ProviderKind::Builtin),
                ],
            )
            .await
            .unwrap();

        let loaded = store.get_session(&session.id).unwrap();
        assert_eq!(loaded.messages.len(), 2);
        assert_eq!(loaded.messages[0].role, Role::User);
        assert_eq!(loaded.messages[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn expired_session_reads_as_not_found_and_is_removed() {
        let dir = tempdir().unwrap();
        let store = store_with_limits(dir.path(), 100, 1);
        let mut session = store.create_session(&UserId::generate()).unwrap();

        // Backdate the last interaction past the expiry horizon.
        session.last_interaction = Utc::now() - Duration::minutes(5);
        store.write_blob(&session).unwrap();

        assert!(matches!(
            store.get_session(&session.id),
            Err(StorageError::SessionNotFound(_))
        ));
        assert!(!store.blob_path(&session.id).exists());
    }

    #[tokio::test]
    async fn concurrent_reads_of_expired_session_all_read_not_found() {
        let dir = tempdir().unwrap();
        let store = Arc::new(store_with_limits(dir.path(), 100, 1));
        let mut session = store.create_session(&UserId::generate()).unwrap();
        session.last_interaction = Utc::now() - Duration::minutes(5);
        store.write_blob(&session).unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let id = session.id.clone();
            handles.push(tokio::spawn(async move { store.get_session(&id) }));
        }
        for handle in handles {
            assert!(matches!(
                handle.await.unwrap(),
                Err(StorageError::SessionNotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn delete_message_refreshes_last_interaction() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();
        let mut updated = store
            .append_messages(&session.id, vec![Message::user("soon gone")])
            .await
            .unwrap();
        let msg_id = updated.messages[0].id.clone();

        // Backdate so the refresh is observable.
        updated.last_interaction = Utc::now() - Duration::minutes(10);
        store.write_blob(&updated).unwrap();

        let after = store.delete_message(&session.id, &msg_id).await.unwrap();
        assert!(after.last_interaction > updated.last_interaction + Duration::minutes(5));
    }

    #[tokio::test]
    async fn edit_records_previous_content() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();
        let updated = store
            .append_messages(&session.id, vec![Message::user("first draft")])
            .await
            .unwrap();
        let msg_id = updated.messages[0].id.clone();

        let edited = store
            .edit_message(&session.id, &msg_id, "second draft")
            .await
            .unwrap();
        let msg = &edited.messages[0];
        assert_eq!(msg.content, "second draft");
        assert!(msg.edited);
        assert_eq!(msg.edit_history.len(), 1);
        assert_eq!(msg.edit_history[0].previous_content, "first draft");
    }

    #[tokio::test]
    async fn editing_unknown_message_is_not_found_with_no_side_effects() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();
        store
            .append_messages(&session.id, vec![Message::user("kept")])
            .await
            .unwrap();

        let missing = solace_core::MessageId::generate();
        assert!(matches!(
            store.edit_message(&session.id, &missing, "x").await,
            Err(StorageError::MessageNotFound(_))
        ));
        let loaded = store.get_session(&session.id).unwrap();
        assert_eq!(loaded.messages[0].content, "kept");
        assert!(!loaded.messages[0].edited);
    }

    #[tokio::test]
    async fn deleted_message_is_tombstoned() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();
        let updated = store
            .append_messages(&session.id, vec![Message::user("remove me")])
            .await
            .unwrap();
        let msg_id = updated.messages[0].id.clone();

        let after = store.delete_message(&session.id, &msg_id).await.unwrap();
        assert!(after.messages[0].deleted);
        assert!(after.messages[0].content.is_empty());

        // A tombstone cannot be edited again.
        assert!(matches!(
            store.edit_message(&session.id, &msg_id, "no").await,
            Err(StorageError::MessageNotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleted_session_hidden_from_get_and_list() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let user = UserId::generate();
        let session = store.create_session(&user).unwrap();

        store.delete_session(&session.id).await.unwrap();
        assert!(matches!(
            store.get_session(&session.id),
            Err(StorageError::SessionNotFound(_))
        ));
        assert!(store.list_for_user(&user).unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_orders_by_recency_and_scopes_to_owner() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let alice = UserId::generate();
        let bob = UserId::generate();

        let first = store.create_session(&alice).unwrap();
        let second = store.create_session(&alice).unwrap();
        store.create_session(&bob).unwrap();

        store
            .append_messages(&first.id, vec![Message::user("older session, newer activity")])
            .await
            .unwrap();

        let listed = store.list_for_user(&alice).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[tokio::test]
    async fn rename_sticks_over_auto_title() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let session = store.create_session(&UserId::generate()).unwrap();

        store.rename_session(&session.id, "Sleep log").await.unwrap();
        let updated = store
            .append_messages(&session.id, vec![Message::user("could not sleep again")])
            .await
            .unwrap();
        assert_eq!(updated.title, "Sleep log");
    }

    #[tokio::test]
    async fn sweep_removes_deleted_blobs() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        let keep = store.create_session(&UserId::generate()).unwrap();
        let drop = store.create_session(&UserId::generate()).unwrap();

        store.delete_session(&drop.id).await.unwrap();
        assert_eq!(store.sweep_expired().unwrap(), 1);
        assert!(store.blob_path(&keep.id).exists());
        assert!(!store.blob_path(&drop.id).exists());
    }

    #[tokio::test]
    async fn wrong_key_surfaces_decryption_error() {
        let dir = tempdir().unwrap();
        let user = UserId::generate();
        let id;
        {
            let store = store_with_key(dir.path(), [1u8; 32]);
            id = store.create_session(&user).unwrap().id;
        }
        let store = store_with_key(dir.path(), [2u8; 32]);
        assert!(matches!(
            store.get_session(&id),
            Err(StorageError::Decryption)
        ));
    }

    fn store_with_key(dir: &Path, key: [u8; 32]) -> SessionStore {
        use base64::Engine;
        let storage = StorageConfig {
            data_dir: dir.to_string_lossy().into_owned(),
            encryption_key: Some(base64::engine::general_purpose::STANDARD.encode(key)),
        };
        SessionStore::open(&storage, &ConversationConfig::default()).unwrap()
    }
}
