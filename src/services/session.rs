// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted authentication session.
//!
//! Exactly one session lives on the device, spread across four keys
//! (token, user JSON, provider, expiry) that are written and removed
//! together. The access token is obfuscated, not encrypted:
//! `<first 16 hex chars of sha256(token)>:<base64(token)>`.
//!
//! Loading fails safe: any missing key, decode error or storage error is
//! reported as "no session".

use crate::error::{AppError, Result};
use crate::models::{AuthProvider, Session, User};
use crate::storage::{keys, SharedStore};
use crate::time_utils::now_millis;
use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

const HASH_PREFIX_LEN: usize = 16;

const SESSION_KEYS: [&str; 4] = [
    keys::AUTH_TOKEN,
    keys::USER_DATA,
    keys::AUTH_PROVIDER,
    keys::SESSION_EXPIRY,
];

/// Obfuscate a token for storage.
pub fn obfuscate_token(token: &str) -> String {
    let digest = hex::encode(Sha256::digest(token.as_bytes()));
    format!("{}:{}", &digest[..HASH_PREFIX_LEN], BASE64.encode(token))
}

/// Reverse `obfuscate_token`. The hash prefix is not verified.
pub fn deobfuscate_token(stored: &str) -> anyhow::Result<String> {
    let encoded = stored
        .split_once(':')
        .map(|(_, encoded)| encoded)
        .filter(|encoded| !encoded.is_empty())
        .context("Invalid obfuscated token format")?;
    let bytes = BASE64.decode(encoded).context("Token is not valid base64")?;
    String::from_utf8(bytes).context("Token is not valid UTF-8")
}

/// Single-session store over the shared key-value backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: SharedStore,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(backend: SharedStore, ttl: chrono::Duration) -> Self {
        Self { backend, ttl }
    }

    /// Session lifetime applied on save and refresh.
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Persist a new session for `user`, replacing any previous one.
    pub async fn save_session(&self, user: &User, token: &str) -> Result<Session> {
        let expires_at = now_millis() + self.ttl.num_milliseconds();
        let user_json = serde_json::to_string(user)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("User encode failed: {}", e)))?;

        self.backend
            .multi_set(vec![
                (keys::AUTH_TOKEN.to_string(), obfuscate_token(token)),
                (keys::USER_DATA.to_string(), user_json),
                (keys::AUTH_PROVIDER.to_string(), user.provider.to_string()),
                (keys::SESSION_EXPIRY.to_string(), expires_at.to_string()),
            ])
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to save session");
                AppError::Storage(format!("Falha ao salvar sessão: {}", e))
            })?;

        tracing::info!(user_id = %user.id, provider = %user.provider, expires_at, "Session saved");

        Ok(Session {
            user: user.clone(),
            provider: user.provider,
            token: token.to_string(),
            expires_at,
        })
    }

    /// Load the stored session, or `None` if absent, expired or unreadable.
    ///
    /// An expired session is cleared as a side effect.
    pub async fn load_session(&self) -> Option<Session> {
        match self.try_load_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load session, treating as signed out");
                None
            }
        }
    }

    async fn try_load_session(&self) -> anyhow::Result<Option<Session>> {
        let values = self.backend.multi_get(&SESSION_KEYS).await?;
        let mut token = None;
        let mut user_json = None;
        let mut expiry = None;
        for (key, value) in values {
            match key.as_str() {
                keys::AUTH_TOKEN => token = value,
                keys::USER_DATA => user_json = value,
                keys::SESSION_EXPIRY => expiry = value,
                _ => {}
            }
        }

        let (Some(token), Some(user_json)) = (token, user_json) else {
            return Ok(None);
        };

        let expires_at = expiry.and_then(|raw| raw.parse::<i64>().ok()).unwrap_or(0);
        if now_millis() > expires_at {
            tracing::info!(expires_at, "Session expired");
            self.clear_session().await?;
            return Ok(None);
        }

        let token = deobfuscate_token(&token)?;
        let user: User = serde_json::from_str(&user_json).context("Invalid stored user data")?;

        tracing::debug!(user_id = %user.id, "Session loaded");
        Ok(Some(Session {
            provider: user.provider,
            user,
            token,
            expires_at,
        }))
    }

    /// Remove all session keys.
    pub async fn clear_session(&self) -> Result<()> {
        self.backend
            .multi_remove(&SESSION_KEYS)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to clear session");
                AppError::Storage(format!("Falha ao limpar sessão: {}", e))
            })?;
        tracing::info!("Session cleared");
        Ok(())
    }

    pub async fn has_valid_session(&self) -> bool {
        self.load_session().await.is_some()
    }

    /// Extend a valid session to `now + ttl`.
    ///
    /// Returns the refreshed session, or `None` if there was nothing valid to refresh.
    pub async fn refresh_session(&self) -> Result<Option<Session>> {
        let Some(mut session) = self.load_session().await else {
            return Ok(None);
        };

        let expires_at = now_millis() + self.ttl.num_milliseconds();
        self.backend
            .set(keys::SESSION_EXPIRY, expires_at.to_string())
            .await
            .map_err(|e| AppError::Storage(format!("Falha ao renovar sessão: {}", e)))?;

        session.expires_at = expires_at;
        tracing::debug!(user_id = %session.user.id, expires_at, "Session refreshed");
        Ok(Some(session))
    }

    /// Raw stored expiry (epoch millis), without validating the session.
    pub async fn session_expires_at(&self) -> Option<i64> {
        match self.backend.get(keys::SESSION_EXPIRY).await {
            Ok(value) => value.and_then(|raw| raw.parse().ok()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session expiry");
                None
            }
        }
    }

    /// Provider recorded for the stored session, if any.
    pub async fn stored_provider(&self) -> Option<AuthProvider> {
        self.backend
            .get(keys::AUTH_PROVIDER)
            .await
            .ok()
            .flatten()
            .and_then(|raw| raw.parse().ok())
    }

    /// Wipe the entire backend (full sign-out including app data).
    pub async fn clear_all(&self) -> Result<()> {
        self.backend.clear().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to clear storage");
            AppError::Storage(format!("Falha ao limpar dados: {}", e))
        })?;
        tracing::info!("All local data cleared");
        Ok(())
    }

    /// Periodically refresh the session in the background.
    ///
    /// The first refresh happens one `period` after spawning. Runs until the
    /// handle is aborted; not coordinated with concurrent sign-out.
    pub fn spawn_refresher(&self, period: std::time::Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                match store.refresh_session().await {
                    Ok(Some(session)) => {
                        tracing::debug!(expires_at = session.expires_at, "Periodic session refresh")
                    }
                    Ok(None) => tracing::debug!("No active session to refresh"),
                    Err(e) => tracing::warn!(error = %e, "Periodic session refresh failed"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscation_format() {
        let stored = obfuscate_token("secret-token");
        let (prefix, encoded) = stored.split_once(':').unwrap();
        assert_eq!(prefix.len(), 16);
        assert!(prefix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(encoded, BASE64.encode("secret-token"));
        assert_eq!(deobfuscate_token(&stored).unwrap(), "secret-token");
    }

    #[test]
    fn test_deobfuscate_rejects_malformed() {
        assert!(deobfuscate_token("no-separator").is_err());
        assert!(deobfuscate_token("abcdef:").is_err());
        assert!(deobfuscate_token("abcdef:!!!not-base64").is_err());
    }
}
