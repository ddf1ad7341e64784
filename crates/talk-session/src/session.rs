use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Result of a successful external login.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: AccessToken,
    pub expires_at: DateTime<Utc>,
    pub scopes: Vec<String>,
}

impl TokenGrant {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: AccessToken::new(access_token),
            expires_at,
            scopes: Vec::new(),
        }
    }

    /// Grant expiring `expires_in` from now, the shape OAuth token responses use.
    pub fn expiring_in(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self::new(access_token, Utc::now() + expires_in)
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

/// Immutable snapshot of an open session, shared by the tasks that use it.
#[derive(Debug)]
pub struct Credential {
    access_token: AccessToken,
    expires_at: DateTime<Utc>,
    scopes: Vec<String>,
    opened_at: DateTime<Utc>,
}

impl Credential {
    pub(crate) fn from_grant(grant: TokenGrant) -> Self {
        Self {
            access_token: grant.access_token,
            expires_at: grant.expires_at,
            scopes: grant.scopes,
            opened_at: Utc::now(),
        }
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.as_str())
    }
}

/// Observable login state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Closed,
    Open,
    Expired,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Closed => write!(f, "closed"),
            SessionState::Open => write!(f, "open"),
            SessionState::Expired => write!(f, "expired"),
        }
    }
}
