//! Private conversations and their message history.

use dashmap::DashMap;
use feralhost_protocol::{AccountId, ConversationId};

use crate::{ChatError, ChatMessage};

/// A direct-message conversation.
#[derive(Debug, Clone, Default)]
pub struct PrivateConversation {
    pub participants: Vec<AccountId>,
    /// Append-only, in posting order.
    pub messages: Vec<ChatMessage>,
}

/// Directory of every private conversation, keyed by conversation id.
#[derive(Debug, Default)]
pub struct DmManager {
    conversations: DashMap<ConversationId, PrivateConversation>,
}

impl DmManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a conversation if it doesn't exist yet.
    ///
    /// Opening an existing conversation adds any participants it didn't
    /// know about. Returns `true` if the conversation was created.
    pub fn open_dm(&self, id: &ConversationId, participants: &[AccountId]) -> bool {
        let mut created = false;
        let mut conversation = self.conversations.entry(id.clone()).or_insert_with(|| {
            created = true;
            PrivateConversation::default()
        });
        for participant in participants {
            if !conversation.participants.contains(participant) {
                conversation.participants.push(participant.clone());
            }
        }
        if created {
            tracing::debug!(conversation = %id, "private conversation opened");
        }
        created
    }

    pub fn dm_exists(&self, id: &ConversationId) -> bool {
        self.conversations.contains_key(id)
    }

    /// Snapshot of a conversation's messages in posting order.
    pub fn dm_history(&self, id: &ConversationId) -> Option<Vec<ChatMessage>> {
        self.conversations.get(id).map(|c| c.messages.clone())
    }

    pub fn participants(&self, id: &ConversationId) -> Option<Vec<AccountId>> {
        self.conversations.get(id).map(|c| c.participants.clone())
    }

    /// Appends a message to an existing conversation.
    pub fn append_message(&self, id: &ConversationId, message: ChatMessage) -> Result<(), ChatError> {
        let mut conversation = self
            .conversations
            .get_mut(id)
            .ok_or_else(|| ChatError::ConversationNotFound(id.clone()))?;
        conversation.messages.push(message);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
