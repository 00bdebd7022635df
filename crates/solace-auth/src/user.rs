// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account records.
//!
//! A [`UserRecord`] is the persisted shape of an account. The password is
//! stored only as an Argon2id PHC hash; the plaintext never leaves the
//! registration or login call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use solace_core::{AuthError, ResponseStyle, SolaceError, UserId};

use crate::password;

/// Per-user presentation preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub response_style: ResponseStyle,
}

/// A persisted account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub consent_given: bool,
    #[serde(default)]
    pub profile: UserProfile,
}

impl UserRecord {
    /// Register a new account, hashing the password.
    pub fn register(
        username: impl Into<String>,
        email: Option<String>,
        password: &str,
    ) -> Result<Self, SolaceError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(SolaceError::Validation("username must not be empty".into()));
        }
        if password.len() < 8 {
            return Err(SolaceError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }
        Ok(Self {
            user_id: UserId::generate(),
            username,
            email,
            password_hash: password::hash_password(password)?,
            created_at: Utc::now(),
            last_login: None,
            disabled: false,
            consent_given: false,
            profile: UserProfile::default(),
        })
    }

    /// Check a login attempt. Disabled accounts fail even with the
    /// correct password.
    pub fn verify_login(&self, password: &str) -> Result<(), AuthError> {
        password::verify_password(password, &self.password_hash)?;
        if self.disabled {
            return Err(AuthError::AccountDisabled);
        }
        Ok(())
    }

    pub fn record_login(&mut self) {
        self.last_login = Some(Utc::now());
    }
}
