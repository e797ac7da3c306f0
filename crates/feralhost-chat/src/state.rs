//! Shared chat server state.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use feralhost_protocol::{AccountId, ConversationId};
use tokio::sync::mpsc;

use crate::{ChatError, DmManager, HistoryEntry, RoomDirectory};

/// Channel sender for delivering encoded frames to one chat client.
pub type ClientSender = mpsc::UnboundedSender<String>;

/// Everything the chat packets operate on.
///
/// One instance is built at server startup and shared with every chat
/// connection through an `Arc`.
#[derive(Debug, Default)]
pub struct ChatState {
    pub rooms: RoomDirectory,
    pub dms: DmManager,
    /// Outbound channel of every connected client.
    clients: DashMap<AccountId, ClientSender>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connected client's outbound channel.
    pub fn connect(&self, account: AccountId, sender: ClientSender) -> Result<(), ChatError> {
        match self.clients.entry(account) {
            Entry::Occupied(entry) => Err(ChatError::AlreadyConnected(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(account = %entry.key(), "chat client connected");
                entry.insert(sender);
                Ok(())
            }
        }
    }

    /// Forgets a client and removes it from every room it joined.
    pub fn disconnect(&self, account: &AccountId) -> Vec<ConversationId> {
        self.clients.remove(account);
        let rooms = self.rooms.leave_all(account);
        tracing::debug!(%account, rooms = rooms.len(), "chat client disconnected");
        rooms
    }

    pub fn is_online(&self, account: &AccountId) -> bool {
        self.clients.contains_key(account)
    }

    pub fn online_count(&self) -> usize {
        self.clients.len()
    }

    /// Queues a frame for one client. Returns `false` if it is offline.
    pub fn send_to(&self, account: &AccountId, frame: String) -> bool {
        self.clients
            .get(account)
            .is_some_and(|sender| sender.send(frame).is_ok())
    }

    /// Queues a frame for every member of a room. Returns how many
    /// members it was delivered to.
    pub fn broadcast(&self, room: &ConversationId, frame: &str) -> usize {
        self.rooms
            .members(room)
            .iter()
            .filter(|member| self.send_to(member, frame.to_string()))
            .count()
    }

    /// The history `requester` may see for `room`.
    ///
    /// Only members of a private room with an open conversation get
    /// anything back; every other request gets an empty list, so a
    /// non-member can't tell whether the conversation exists.
    pub fn history_for(&self, requester: &AccountId, room: &ConversationId) -> Vec<HistoryEntry> {
        if !self.rooms.is_member(requester, room) || !self.rooms.is_private(room) {
            return Vec::new();
        }
        let Some(messages) = self.dms.dm_history(room) else {
            return Vec::new();
        };

        // One membership snapshot for the whole reply.
        let participants: Vec<AccountId> = self
            .rooms
            .members(room)
            .into_iter()
            .filter(|member| member != requester)
            .collect();

        messages
            .iter()
            .map(|message| message.history_entry(room, participants.clone()))
            .collect()
    }
}
