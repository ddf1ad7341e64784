//! Process-wide holder of the current credential.
//!
//! The credential is swapped as a whole `Arc`; tasks keep the snapshot they
//! started with, so invalidation never tears a request already in flight.

use crate::session::{Credential, SessionState, TokenGrant};
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock};
use talk_core::error::{Result, TalkError};
use tokio::sync::watch;

static SHARED: LazyLock<Arc<AuthSession>> = LazyLock::new(|| Arc::new(AuthSession::new()));

pub struct AuthSession {
    credential: RwLock<Option<Arc<Credential>>>,
    state_tx: watch::Sender<SessionState>,
}

impl AuthSession {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(SessionState::Closed);
        Self {
            credential: RwLock::new(None),
            state_tx,
        }
    }

    /// The app-wide session.
    pub fn shared() -> &'static Arc<AuthSession> {
        &SHARED
    }

    /// Install the credential produced by a successful login callback.
    pub fn open(&self, grant: TokenGrant) -> Result<()> {
        if grant.access_token.is_empty() {
            return Err(TalkError::Validation("access token is empty".into()));
        }
        if grant.expires_at <= Utc::now() {
            return Err(TalkError::Validation("access token already expired".into()));
        }
        let credential = Arc::new(Credential::from_grant(grant));
        tracing::info!(expires_at = %credential.expires_at(), "session opened");
        let mut guard = self.credential.write();
        *guard = Some(credential);
        // Published under the lock so state transitions follow swap order.
        self.state_tx.send_replace(SessionState::Open);
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.credential().is_ok()
    }

    /// Snapshot of the current credential, or `Auth` when unset or expired.
    pub fn credential(&self) -> Result<Arc<Credential>> {
        let current = self.credential.read().clone();
        match current {
            None => Err(TalkError::Auth("no open session".into())),
            Some(c) if c.is_expired_at(Utc::now()) => {
                if self.clear_if_current(&c, SessionState::Expired) {
                    tracing::info!(expired_at = %c.expires_at(), "session expired");
                }
                Err(TalkError::Auth("session expired".into()))
            }
            Some(c) => Ok(c),
        }
    }

    /// Logout. Tasks issued afterwards fail with `Auth`.
    pub fn invalidate(&self) {
        let mut guard = self.credential.write();
        if guard.take().is_some() {
            self.state_tx.send_replace(SessionState::Closed);
            drop(guard);
            tracing::info!("session invalidated");
        }
    }

    /// Invalidate only if `seen` is still the installed credential, so a
    /// stale rejection cannot close a session opened in the meantime.
    pub fn invalidate_credential(&self, seen: &Arc<Credential>) {
        if self.clear_if_current(seen, SessionState::Closed) {
            tracing::warn!("session invalidated after provider rejected its token");
        }
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.credential().map(|c| c.has_scope(scope)).unwrap_or(false)
    }

    pub fn state(&self) -> SessionState {
        // Refresh lazily-detected expiry before reporting.
        let _ = self.credential();
        let _guard = self.credential.read();
        *self.state_tx.borrow()
    }

    /// Observe open/close/expire transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    fn clear_if_current(&self, seen: &Arc<Credential>, next: SessionState) -> bool {
        let mut guard = self.credential.write();
        let is_current = guard.as_ref().is_some_and(|c| Arc::ptr_eq(c, seen));
        if is_current {
            *guard = None;
            self.state_tx.send_replace(next);
        }
        is_current
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}
