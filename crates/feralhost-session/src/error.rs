//! Error types for the session layer.

use feralhost_protocol::AccountId;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Authentication failed: the token was unknown, expired, or rejected
    /// by the [`Authenticator`](crate::Authenticator).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// No live session exists for the given account.
    #[error("session not found for {0}")]
    NotFound(AccountId),

    /// The account already has a live session on this server.
    /// An account can only be connected once, so its inventory is never
    /// shared between two connections.
    #[error("{0} already has an active session")]
    AlreadyConnected(AccountId),
}
