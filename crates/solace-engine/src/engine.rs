// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The engine proper: account lifecycle, the message pipeline, and
//! owner-scoped session management.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use solace_auth::{TokenAuthority, UserProfile, UserRecord};
use solace_cascade::{render_prompt, Cascade};
use solace_config::SolaceConfig;
use solace_core::{
    AuthError, FeatureExtractor, Message, NlpFeatures, ProviderKind, ResponseStyle,
    SafetyVerdict, Session, SessionId, SolaceError, UserId,
};
use solace_nlp::extractor_from_config;
use solace_safety::SafetyGate;
use solace_store::{SessionStore, SessionSummary, UserStore};

/// Outcome of one message exchange.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub session_id: SessionId,
    /// The assistant message exactly as persisted.
    pub reply: Message,
    /// Verdict attached to the user's message.
    pub verdict: SafetyVerdict,
    /// Which generator produced the reply text.
    pub provider: ProviderKind,
}

impl ChatReply {
    /// Whether the reply is the reserved crisis-resource text.
    pub fn crisis_resources_shown(&self) -> bool {
        self.verdict.is_crisis()
    }
}

/// Orchestrates the full conversation pipeline.
pub struct ChatEngine {
    config: SolaceConfig,
    authority: TokenAuthority,
    sessions: SessionStore,
    users: UserStore,
    gate: SafetyGate,
    extractor: Arc<dyn FeatureExtractor>,
    cascade: Cascade,
}

impl ChatEngine {
    /// Assemble the engine from configuration.
    pub fn from_config(config: SolaceConfig) -> Result<Self, SolaceError> {
        let extractor = extractor_from_config(&config.nlp)?;
        let cascade = Cascade::from_config(&config.cascade, &config.gemini, &config.openai)?;
        Self::with_parts(config, extractor, cascade)
    }

    /// Assemble with an explicit extractor and cascade. Used by tests to
    /// substitute deterministic mocks.
    pub fn with_parts(
        config: SolaceConfig,
        extractor: Arc<dyn FeatureExtractor>,
        cascade: Cascade,
    ) -> Result<Self, SolaceError> {
        let authority = TokenAuthority::from_config(&config.auth);
        let sessions = SessionStore::open(&config.storage, &config.conversation)?;
        let users = UserStore::open(&config.storage)?;
        Ok(Self {
            config,
            authority,
            sessions,
            users,
            gate: SafetyGate::new(),
            extractor,
            cascade,
        })
    }

    // ---- accounts ----

    /// Register a new account. Usernames are unique.
    pub fn register(
        &self,
        username: &str,
        email: Option<String>,
        password: &str,
    ) -> Result<UserRecord, SolaceError> {
        if self.users.find_by_username(username)?.is_some() {
            return Err(SolaceError::Validation(format!(
                "username already taken: {username}"
            )));
        }
        let user = UserRecord::register(username, email, password)?;
        self.users.save_user(&user)?;
        info!(user_id = %user.user_id, "account registered");
        Ok(user)
    }

    /// Verify credentials and issue a session token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, SolaceError> {
        let mut user = self
            .users
            .find_by_username(username)?
            .ok_or(AuthError::InvalidCredentials)?;
        user.verify_login(password)?;
        user.record_login();
        self.users.save_user(&user)?;
        debug!(user_id = %user.user_id, "login succeeded");
        Ok(self.authority.issue(&user.user_id))
    }

    /// Exchange a valid (or just-expired, within grace) token for a fresh one.
    pub fn refresh_token(&self, token: &str) -> Result<String, SolaceError> {
        let refreshed = self.authority.refresh(token, |user_id| {
            // An unreadable account refuses refresh the same as a disabled one.
            self.users
                .load_user(user_id)
                .map(|u| u.disabled)
                .unwrap_or(true)
        })?;
        Ok(refreshed)
    }

    /// Invalidate a token. A no-op unless a revocation list is configured.
    pub fn logout(&self, token: &str) {
        self.authority.revoke(token);
    }

    /// Replace the caller's profile. The response style takes effect on the
    /// next generated reply.
    pub fn update_profile(&self, token: &str, profile: UserProfile) -> Result<UserRecord, SolaceError> {
        let user_id = self.authority.validate(token)?;
        let mut user = self.users.load_user(&user_id)?;
        user.profile = profile;
        self.users.save_user(&user)?;
        debug!(user_id = %user.user_id, "profile updated");
        Ok(user)
    }

    /// Record the caller's consent decision.
    pub fn set_consent(&self, token: &str, consent_given: bool) -> Result<UserRecord, SolaceError> {
        let user_id = self.authority.validate(token)?;
        let mut user = self.users.load_user(&user_id)?;
        user.consent_given = consent_given;
        self.users.save_user(&user)?;
        info!(user_id = %user.user_id, consent_given, "consent recorded");
        Ok(user)
    }

    // ---- the message pipeline ----

    /// Handle one inbound message. With `session_id` absent, a fresh
    /// session is created and its id returned in the reply.
    pub async fn send_message(
        &self,
        token: &str,
        session_id: Option<&SessionId>,
        text: &str,
    ) -> Result<ChatReply, SolaceError> {
        let user_id = self.authority.validate(token)?;
        self.validate_input(text)?;

        let session = match session_id {
            Some(id) => self.owned_session(&user_id, id)?,
            None => self.sessions.create_session(&user_id)?,
        };
        let style = self.response_style(&user_id);

        // Deterministic gate pass before any extraction work. Crisis and
        // off-topic verdicts serve a reserved reply with no provider calls.
        let pre_verdict = self.gate.classify(text, None);
        if let Some(reserved) = self.gate.reserved_reply(&pre_verdict) {
            return self
                .finish_reserved(&session.id, text, pre_verdict, None, reserved)
                .await;
        }

        let features = self.extract_features(text).await;

        let verdict = match &features {
            Some(f) => self.gate.classify(text, Some(f)),
            // The pre-pass already classified with the stricter bound.
            None => pre_verdict,
        };
        if let Some(reserved) = self.gate.reserved_reply(&verdict) {
            return self
                .finish_reserved(&session.id, text, verdict, features, reserved)
                .await;
        }

        // Snapshot the context before any provider call; the session lock
        // is only taken for the final append.
        let generation_features = features.clone().unwrap_or_else(NlpFeatures::neutral);
        let context = session.context_window(self.config.conversation.context_window);
        let prompt = render_prompt(context, text, &generation_features, style, verdict.severity);
        let candidate = self
            .cascade
            .generate(&prompt, &generation_features, style)
            .await;

        let mut user_message = Message::user(text);
        user_message.verdict = Some(verdict);
        user_message.features = features;
        let reply = Message::assistant(candidate.text, candidate.provider);

        let updated = self
            .sessions
            .append_messages(&session.id, vec![user_message, reply.clone()])
            .await?;
        Ok(ChatReply {
            session_id: updated.id,
            reply,
            verdict,
            provider: candidate.provider,
        })
    }

    /// One-shot chat with no account, session, or persistence. The gate
    /// still runs first; reserved replies short-circuit generation.
    pub async fn chat_once(&self, text: &str, style: ResponseStyle) -> Result<ChatReply, SolaceError> {
        self.validate_input(text)?;

        let pre_verdict = self.gate.classify(text, None);
        if let Some(reserved) = self.gate.reserved_reply(&pre_verdict) {
            return Ok(ChatReply {
                session_id: SessionId::generate(),
                reply: Message::assistant(reserved, ProviderKind::Builtin),
                verdict: pre_verdict,
                provider: ProviderKind::Builtin,
            });
        }

        let features = self.extract_features(text).await;
        let verdict = match &features {
            Some(f) => self.gate.classify(text, Some(f)),
            None => pre_verdict,
        };
        if let Some(reserved) = self.gate.reserved_reply(&verdict) {
            return Ok(ChatReply {
                session_id: SessionId::generate(),
                reply: Message::assistant(reserved, ProviderKind::Builtin),
                verdict,
                provider: ProviderKind::Builtin,
            });
        }

        let generation_features = features.unwrap_or_else(NlpFeatures::neutral);
        let prompt = render_prompt(&[], text, &generation_features, style, verdict.severity);
        let candidate = self
            .cascade
            .generate(&prompt, &generation_features, style)
            .await;
        Ok(ChatReply {
            session_id: SessionId::generate(),
            reply: Message::assistant(candidate.text, candidate.provider),
            verdict,
            provider: candidate.provider,
        })
    }

    // ---- owner-scoped session management ----

    pub fn list_sessions(&self, token: &str) -> Result<Vec<SessionSummary>, SolaceError> {
        let user_id = self.authority.validate(token)?;
        Ok(self.sessions.list_for_user(&user_id)?)
    }

    pub fn get_session(&self, token: &str, id: &SessionId) -> Result<Session, SolaceError> {
        let user_id = self.authority.validate(token)?;
        self.owned_session(&user_id, id)
    }

    pub async fn rename_session(
        &self,
        token: &str,
        id: &SessionId,
        title: &str,
    ) -> Result<Session, SolaceError> {
        let user_id = self.authority.validate(token)?;
        if title.trim().is_empty() {
            return Err(SolaceError::Validation("title must not be empty".into()));
        }
        self.owned_session(&user_id, id)?;
        Ok(self.sessions.rename_session(id, title.trim()).await?)
    }

    pub async fn delete_session(&self, token: &str, id: &SessionId) -> Result<(), SolaceError> {
        let user_id = self.authority.validate(token)?;
        self.owned_session(&user_id, id)?;
        Ok(self.sessions.delete_session(id).await?)
    }

    pub async fn edit_message(
        &self,
        token: &str,
        session_id: &SessionId,
        message_id: &solace_core::MessageId,
        new_content: &str,
    ) -> Result<Session, SolaceError> {
        let user_id = self.authority.validate(token)?;
        self.validate_input(new_content)?;
        self.owned_session(&user_id, session_id)?;
        Ok(self
            .sessions
            .edit_message(session_id, message_id, new_content)
            .await?)
    }

    pub async fn delete_message(
        &self,
        token: &str,
        session_id: &SessionId,
        message_id: &solace_core::MessageId,
    ) -> Result<Session, SolaceError> {
        let user_id = self.authority.validate(token)?;
        self.owned_session(&user_id, session_id)?;
        Ok(self.sessions.delete_message(session_id, message_id).await?)
    }

    /// Remove expired and soft-deleted session blobs.
    pub fn sweep_expired(&self) -> Result<usize, SolaceError> {
        Ok(self.sessions.sweep_expired()?)
    }

    // ---- internals ----

    /// Time-bounded feature extraction. A slow or failing extractor
    /// degrades to `None`, which keeps the gate on its stricter path.
    async fn extract_features(&self, text: &str) -> Option<NlpFeatures> {
        let extract_timeout = Duration::from_millis(self.config.nlp.timeout_ms);
        match tokio::time::timeout(extract_timeout, self.extractor.analyze(text)).await {
            Ok(Ok(features)) => Some(features),
            Ok(Err(e)) => {
                warn!(error = %e, "feature extraction failed, using neutral defaults");
                None
            }
            Err(_) => {
                warn!(timeout = ?extract_timeout, "feature extraction timed out, using neutral defaults");
                None
            }
        }
    }

    /// Load a session and enforce ownership. A session owned by someone
    /// else is an authorization failure, not a lookup miss.
    fn owned_session(&self, user_id: &UserId, id: &SessionId) -> Result<Session, SolaceError> {
        let session = self.sessions.get_session(id)?;
        if &session.user_id != user_id {
            warn!(session_id = %id, "cross-user session access refused");
            return Err(AuthError::Forbidden.into());
        }
        Ok(session)
    }

    fn validate_input(&self, text: &str) -> Result<(), SolaceError> {
        if text.trim().is_empty() {
            return Err(SolaceError::Validation("message must not be empty".into()));
        }
        let max = self.config.conversation.max_message_chars;
        if text.chars().count() > max {
            return Err(SolaceError::Validation(format!(
                "message exceeds {max} characters"
            )));
        }
        Ok(())
    }

    fn response_style(&self, user_id: &UserId) -> ResponseStyle {
        self.users
            .load_user(user_id)
            .map(|u| u.profile.response_style)
            .unwrap_or_default()
    }

    /// Persist the user message and the reserved reply as one exchange.
    async fn finish_reserved(
        &self,
        session_id: &SessionId,
        text: &str,
        verdict: SafetyVerdict,
        features: Option<NlpFeatures>,
        reserved: &str,
    ) -> Result<ChatReply, SolaceError> {
        if verdict.is_crisis() {
            warn!(session_id = %session_id, "crisis verdict, serving reserved resources");
        }
        let mut user_message = Message::user(text);
        user_message.verdict = Some(verdict);
        user_message.features = features;
        let reply = Message::assistant(reserved, ProviderKind::Builtin);

        let updated = self
            .sessions
            .append_messages(session_id, vec![user_message, reply.clone()])
            .await?;
        Ok(ChatReply {
            session_id: updated.id,
            reply,
            verdict,
            provider: ProviderKind::Builtin,
        })
    }
}
