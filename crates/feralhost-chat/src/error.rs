//! Error types for the chat layer.

use feralhost_protocol::{AccountId, ConversationId};

/// Errors that can occur during chat operations.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The account is not joined to the room.
    #[error("{0} is not in room {1}")]
    NotInRoom(AccountId, ConversationId),

    /// No private conversation with this id exists.
    #[error("conversation {0} not found")]
    ConversationNotFound(ConversationId),

    /// The account already has a connected chat client.
    #[error("{0} already has a chat client connected")]
    AlreadyConnected(AccountId),
}
