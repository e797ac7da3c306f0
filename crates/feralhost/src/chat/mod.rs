//! The chat server's per-connection context and packet set.

mod history;
mod post;
mod room;

use std::sync::Arc;

use feralhost_chat::ChatState;
use feralhost_protocol::{AccountId, ChatFormat, PacketRegistry};

pub use history::HistoryRequest;
pub use post::PostMessage;
pub use room::{JoinRoom, LeaveRoom};

/// Registry type the chat server dispatches with.
pub type ChatPackets = PacketRegistry<ChatFormat, ChatContext>;

/// Identifier of the chat handshake packet.
pub const SESSION_START: &str = "sessions.start";

/// The authenticated chat client a packet was received from.
pub struct ChatContext {
    account: AccountId,
    state: Arc<ChatState>,
}

impl ChatContext {
    pub fn new(account: AccountId, state: Arc<ChatState>) -> Self {
        Self { account, state }
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }
}

/// The packets every chat server registers.
pub fn chat_packets() -> ChatPackets {
    PacketRegistry::new()
        .with(Box::new(HistoryRequest::default()))
        .with(Box::new(JoinRoom::default()))
        .with(Box::new(LeaveRoom::default()))
        .with(Box::new(PostMessage::default()))
}
