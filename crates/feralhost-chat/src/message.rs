//! Chat messages and their wire views.

use chrono::{SecondsFormat, Utc};
use feralhost_protocol::{AccountId, ConversationId, name_uuid};
use serde::Serialize;

/// `conversation_type` of every direct-message room.
pub const PRIVATE_CONVERSATION: &str = "private";

/// `conversation_type` of every other room.
pub const ROOM_CONVERSATION: &str = "room";

/// One message posted to a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub content: String,
    /// RFC 3339 timestamp, millisecond precision, UTC.
    pub sent_at: String,
    pub source: AccountId,
}

impl ChatMessage {
    /// A message sent now.
    pub fn new(content: impl Into<String>, source: AccountId) -> Self {
        Self::with_timestamp(
            content,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            source,
        )
    }

    pub fn with_timestamp(
        content: impl Into<String>,
        sent_at: impl Into<String>,
        source: AccountId,
    ) -> Self {
        Self {
            content: content.into(),
            sent_at: sent_at.into(),
            source,
        }
    }

    /// The id the client knows this message by.
    ///
    /// Derived from the timestamp alone, so two messages sent in the
    /// same millisecond share an id.
    pub fn message_id(&self) -> String {
        format!("msg-{}", name_uuid(self.sent_at.as_bytes()))
    }

    /// The message as it appears inside a `chat.postMessage` event.
    pub fn view(&self) -> MessageView {
        MessageView {
            body: self.content.clone(),
            message_id: self.message_id(),
            sent_at: self.sent_at.clone(),
            source: self.source.clone(),
        }
    }

    /// The message as it appears in a `conversations.history` reply.
    pub fn history_entry(
        &self,
        conversation: &ConversationId,
        participants: Vec<AccountId>,
    ) -> HistoryEntry {
        HistoryEntry {
            body: self.content.clone(),
            conversation_id: conversation.clone(),
            conversation_type: PRIVATE_CONVERSATION,
            mask: None,
            message_id: self.message_id(),
            participants,
            sent_at: self.sent_at.clone(),
            source: self.sent_at.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub body: String,
    pub message_id: String,
    pub sent_at: String,
    pub source: AccountId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub body: String,
    pub conversation_id: ConversationId,
    pub conversation_type: &'static str,
    /// Always `null`; the client expects the key.
    pub mask: Option<String>,
    pub message_id: String,
    /// Other members of the room, excluding the requester.
    pub participants: Vec<AccountId>,
    pub sent_at: String,
    /// Carries the timestamp, not the sender. Existing clients read it
    /// that way.
    pub source: String,
}
