// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC-SHA256 signed session tokens.
//!
//! A token is `base64url(payload_json) . base64url(hmac(payload_json))`.
//! The payload embeds the user id, the signing key's id, and issue/expiry
//! timestamps, so validation needs no database round trip. The signing key
//! is process-wide and immutable for the process lifetime; rotation means
//! restart, after which old-key tokens fail with `UnknownKey`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

use solace_core::{AuthError, UserId};

use crate::revocation::RevocationList;

type HmacSha256 = Hmac<Sha256>;

/// Claims embedded in a token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    kid: String,
    iat: i64,
    exp: i64,
}

/// Issues, validates, and refreshes session tokens.
///
/// Holds the process-wide signing secret. Optionally consults a
/// [`RevocationList`] before declaring any token valid; with no list
/// configured, tokens are purely stateless-expiry-based.
pub struct TokenAuthority {
    signing_key: Zeroizing<Vec<u8>>,
    key_id: String,
    expiry: Duration,
    refresh_grace: Duration,
    revocation: Option<Box<dyn RevocationList>>,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("signing_key", &"[redacted]")
            .field("key_id", &self.key_id)
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl TokenAuthority {
    /// Create an authority with an explicit signing secret.
    pub fn new(
        signing_key: impl Into<Vec<u8>>,
        key_id: impl Into<String>,
        expiry_hours: u64,
        refresh_grace_minutes: u64,
    ) -> Self {
        Self {
            signing_key: Zeroizing::new(signing_key.into()),
            key_id: key_id.into(),
            expiry: Duration::hours(expiry_hours as i64),
            refresh_grace: Duration::minutes(refresh_grace_minutes as i64),
            revocation: None,
        }
    }

    /// Build from config, generating an ephemeral secret when none is set.
    /// Ephemeral secrets mean tokens do not survive a restart.
    pub fn from_config(config: &solace_config::model::AuthConfig) -> Self {
        let key: Vec<u8> = match &config.signing_key {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                debug!("no signing key configured, generating ephemeral secret");
                use rand::RngCore;
                let mut bytes = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                bytes
            }
        };
        Self::new(
            key,
            config.key_id.clone(),
            config.token_expiry_hours,
            config.refresh_grace_minutes,
        )
    }

    /// Attach a revocation list, consulted before any token is declared valid.
    pub fn with_revocation(mut self, revocation: Box<dyn RevocationList>) -> Self {
        self.revocation = Some(revocation);
        self
    }

    /// Issue a token for `user_id` expiring `token_expiry_hours` from now.
    pub fn issue(&self, user_id: &UserId) -> String {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: &UserId, now: DateTime<Utc>) -> String {
        let claims = Claims {
            sub: user_id.0.clone(),
            kid: self.key_id.clone(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        // Claims contains only plain fields; serialization cannot fail.
        let payload = serde_json::to_vec(&claims).unwrap_or_default();
        let sig = self.sign(&payload);
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(sig)
        )
    }

    /// Validate a token and return the embedded user id.
    ///
    /// A token is valid iff the signature verifies under the current key,
    /// it is unexpired, and (if a revocation list is configured) it has not
    /// been revoked.
    pub fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        self.validate_at(token, Utc::now())
    }

    fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        let claims = self.verify_signature(token)?;
        if let Some(revocation) = &self.revocation {
            if revocation.is_revoked(token) {
                return Err(AuthError::Revoked);
            }
        }
        if now.timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }
        Ok(UserId(claims.sub))
    }

    /// Refresh a token, issuing a new one with a renewed expiry.
    ///
    /// Accepts tokens that are still valid or expired within the grace
    /// window. `is_disabled` is consulted so an account disabled since
    /// issuance cannot mint fresh credentials.
    pub fn refresh<F>(&self, token: &str, is_disabled: F) -> Result<String, AuthError>
    where
        F: FnOnce(&UserId) -> bool,
    {
        self.refresh_at(token, is_disabled, Utc::now())
    }

    fn refresh_at<F>(
        &self,
        token: &str,
        is_disabled: F,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError>
    where
        F: FnOnce(&UserId) -> bool,
    {
        let claims = self.verify_signature(token)?;
        if let Some(revocation) = &self.revocation {
            if revocation.is_revoked(token) {
                return Err(AuthError::Revoked);
            }
        }
        if now.timestamp() > claims.exp + self.refresh_grace.num_seconds() {
            return Err(AuthError::Expired);
        }
        let user_id = UserId(claims.sub);
        if is_disabled(&user_id) {
            return Err(AuthError::AccountDisabled);
        }
        Ok(self.issue_at(&user_id, now))
    }

    /// Revoke a token. No-op unless a revocation list is configured,
    /// matching a stateless logout having no server-side effect.
    pub fn revoke(&self, token: &str) {
        if let Some(revocation) = &self.revocation {
            revocation.revoke(token);
        }
    }

    /// Verify structure, key id, and signature. Does not check expiry.
    fn verify_signature(&self, token: &str) -> Result<Claims, AuthError> {
        let (payload_b64, sig_b64) = token.split_once('.').ok_or(AuthError::Malformed)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::Malformed)?;
        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64)
            .map_err(|_| AuthError::Malformed)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::Malformed)?;

        // Distinguish rotated-out key material from tampering.
        if claims.kid != self.key_id {
            return Err(AuthError::UnknownKey);
        }

        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .map_err(|_| AuthError::Malformed)?;
        mac.update(&payload);
        mac.verify_slice(&sig).map_err(|_| AuthError::Malformed)?;

        Ok(claims)
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .expect("HMAC accepts keys of any length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revocation::MemoryRevocationList;

    fn authority() -> TokenAuthority {
        TokenAuthority::new(b"test-signing-secret".to_vec(), "k1", 24, 5)
    }

    #[test]
    fn validate_returns_user_immediately_after_issue() {
        let auth = authority();
        let user = UserId("user-1".into());
        let token = auth.issue(&user);
        assert_eq!(auth.validate(&token).unwrap(), user);
    }

    #[test]
    fn expired_token_rejected() {
        let auth = authority();
        let user = UserId("user-1".into());
        let issued = Utc::now() - Duration::hours(25);
        let token = auth.issue_at(&user, issued);
        assert_eq!(auth.validate(&token), Err(AuthError::Expired));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let auth = authority();
        assert_eq!(auth.validate("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(auth.validate("a.b"), Err(AuthError::Malformed));
        assert_eq!(auth.validate(""), Err(AuthError::Malformed));
    }

    #[test]
    fn tampered_payload_is_malformed() {
        let auth = authority();
        let token = auth.issue(&UserId("user-1".into()));
        let (payload, sig) = token.split_once('.').unwrap();
        let forged_claims = Claims {
            sub: "user-2".into(),
            kid: "k1".into(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(24)).timestamp(),
        };
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        assert_ne!(forged, payload);
        let tampered = format!("{forged}.{sig}");
        assert_eq!(auth.validate(&tampered), Err(AuthError::Malformed));
    }

    #[test]
    fn token_from_rotated_key_id_is_unknown() {
        let old = TokenAuthority::new(b"secret".to_vec(), "k1", 24, 5);
        let new = TokenAuthority::new(b"secret".to_vec(), "k2", 24, 5);
        let token = old.issue(&UserId("user-1".into()));
        assert_eq!(new.validate(&token), Err(AuthError::UnknownKey));
    }

    #[test]
    fn token_signed_by_different_secret_is_malformed() {
        let a = TokenAuthority::new(b"secret-a".to_vec(), "k1", 24, 5);
        let b = TokenAuthority::new(b"secret-b".to_vec(), "k1", 24, 5);
        let token = a.issue(&UserId("user-1".into()));
        assert_eq!(b.validate(&token), Err(AuthError::Malformed));
    }

    #[test]
    fn refresh_renews_expiry_within_grace() {
        let auth = authority();
        let user = UserId("user-1".into());
        // Expired 3 minutes ago, inside the 5 minute grace window.
        let issued = Utc::now() - Duration::hours(24) - Duration::minutes(3);
        let token = auth.issue_at(&user, issued);
        assert_eq!(auth.validate(&token), Err(AuthError::Expired));

        let refreshed = auth.refresh(&token, |_| false).unwrap();
        assert_eq!(auth.validate(&refreshed).unwrap(), user);
    }

    #[test]
    fn refresh_rejected_past_grace() {
        let auth = authority();
        let issued = Utc::now() - Duration::hours(25);
        let token = auth.issue_at(&UserId("user-1".into()), issued);
        assert_eq!(auth.refresh(&token, |_| false), Err(AuthError::Expired));
    }

    #[test]
    fn refresh_rejected_for_disabled_account() {
        let auth = authority();
        let token = auth.issue(&UserId("user-1".into()));
        assert_eq!(
            auth.refresh(&token, |_| true),
            Err(AuthError::AccountDisabled)
        );
    }

    #[test]
    fn revoked_token_rejected_when_list_configured() {
        let auth = authority().with_revocation(Box::new(MemoryRevocationList::new()));
        let token = auth.issue(&UserId("user-1".into()));
        assert!(auth.validate(&token).is_ok());

        auth.revoke(&token);
        assert_eq!(auth.validate(&token), Err(AuthError::Revoked));
        assert_eq!(auth.refresh(&token, |_| false), Err(AuthError::Revoked));
    }

    #[test]
    fn revoke_without_list_is_noop() {
        let auth = authority();
        let token = auth.issue(&UserId("user-1".into()));
        auth.revoke(&token);
        assert!(auth.validate(&token).is_ok());
    }

    #[test]
    fn debug_redacts_signing_key() {
        let auth = authority();
        let debug = format!("{auth:?}");
        assert!(!debug.contains("test-signing-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
