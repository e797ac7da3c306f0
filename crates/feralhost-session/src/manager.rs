//! The session manager: tracks every live session on one server.
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself; it uses a plain
//! `HashMap`. The server wraps each manager in a mutex and only holds
//! the lock for the duration of a single `create` or `disconnect`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use feralhost_protocol::AccountId;

use crate::{Session, SessionError};

/// Registry of connected accounts.
///
/// ```text
/// authenticate() ──→ create() ──→ [connected] ──→ disconnect()
///                       │
///                       └── AlreadyConnected if the account is live
/// ```
#[derive(Debug, Default)]
pub struct SessionManager {
    /// Live sessions, keyed by account. An account has at most one.
    sessions: HashMap<AccountId, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for an account that just authenticated.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the account already
    /// has a live session.
    pub fn create(&mut self, account: AccountId) -> Result<&Session, SessionError> {
        match self.sessions.entry(account) {
            Entry::Occupied(entry) => Err(SessionError::AlreadyConnected(entry.key().clone())),
            Entry::Vacant(entry) => {
                let session = Session::new(entry.key().clone());
                tracing::info!(
                    account = %session.account,
                    session_id = %session.session_id,
                    "session created"
                );
                Ok(entry.insert(session))
            }
        }
    }

    /// Ends an account's session and returns it.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the account isn't connected.
    pub fn disconnect(&mut self, account: &AccountId) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(account)
            .ok_or_else(|| SessionError::NotFound(account.clone()))?;

        tracing::info!(
            %account,
            session_id = %session.session_id,
            uptime_secs = session.uptime().as_secs(),
            "session ended"
        );
        Ok(session)
    }

    pub fn get(&self, account: &AccountId) -> Option<&Session> {
        self.sessions.get(account)
    }

    pub fn is_connected(&self, account: &AccountId) -> bool {
        self.sessions.contains_key(account)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
