//! The server's record of one connected account.

use std::time::{Duration, Instant};

use feralhost_protocol::AccountId;

use crate::generate_token;

/// A single account's live session on one of the servers.
///
/// Created after the connection authenticates, dropped when it closes.
#[derive(Debug, Clone)]
pub struct Session {
    /// Which account this session belongs to.
    pub account: AccountId,

    /// Random id for log correlation (32 hex chars).
    pub session_id: String,

    /// When the connection authenticated.
    pub connected_at: Instant,
}

impl Session {
    pub fn new(account: AccountId) -> Self {
        Self {
            account,
            session_id: generate_token(),
            connected_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
