// --- File: crates/roombook_graph/src/auth.rs ---
//! Client-credentials tokens for Microsoft Graph.
//!
//! [`ClientCredentialsProvider`] performs one token request per call.
//! [`CachingTokenProvider`] wraps any provider and reuses a credential until
//! shortly before its `expires_in` elapses.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use roombook_config::GraphConfig;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Credentials are treated as expired this long before the server says so.
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// A bearer credential issued by the identity service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// `true` while the credential is still usable at `now`, allowing for the skew.
    /// A credential without an expiry is never considered fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at
                .checked_sub_signed(Duration::seconds(EXPIRY_SKEW_SECS))
                .is_some_and(|deadline| deadline > now),
            None => false,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of bearer credentials for Graph calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn acquire(&self) -> Result<Credential, AuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    expires_in: Option<i64>,
}

/// Accepts `3599` or `"3599"`. Any other shape is treated as absent.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// `None` when the lifetime cannot be represented as a timestamp.
fn expiry_after(now: DateTime<Utc>, secs: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(secs).and_then(|lifetime| now.checked_add_signed(lifetime))
}

/// Fetches a new token from `{authority_host}/{tenant}/oauth2/v2.0/token` on every call.
pub struct ClientCredentialsProvider {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl ClientCredentialsProvider {
    pub fn new(config: &GraphConfig, client: Client) -> Self {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            config.authority_host.trim_end_matches('/'),
            config.tenant_id
        );
        Self {
            client,
            token_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn acquire(&self) -> Result<Credential, AuthError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        debug!("Requesting Graph token from {}", self.token_url);
        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token request rejected with status {}", status);
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingAccessToken)?;
        let expires_at = token
            .expires_in
            .and_then(|secs| expiry_after(Utc::now(), secs));

        Ok(Credential::new(access_token, expires_at))
    }
}

/// Reuses the last credential from `inner` while it is fresh.
///
/// The lock is held across the refresh so concurrent callers wait for a
/// single token request.
pub struct CachingTokenProvider<P> {
    inner: P,
    cached: Mutex<Option<Credential>>,
}

impl<P: TokenProvider> CachingTokenProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<P: TokenProvider> TokenProvider for CachingTokenProvider<P> {
    async fn acquire(&self) -> Result<Credential, AuthError> {
        let mut cached = self.cached.lock().await;
        if let Some(credential) = cached.as_ref() {
            if credential.is_fresh_at(Utc::now()) {
                return Ok(credential.clone());
            }
        }

        let credential = self.inner.acquire().await?;
        if credential.expires_at.is_some() {
            info!("Cached new Graph token until {:?}", credential.expires_at);
            *cached = Some(credential.clone());
        } else {
            cached.take();
        }
        Ok(credential)
    }
}
