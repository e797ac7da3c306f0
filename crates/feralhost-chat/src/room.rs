//! Room directory: which accounts are joined to which chat rooms.
//!
//! Rooms are created by the first join and destroyed when the last
//! member leaves. The directory keeps a reverse index from account to
//! rooms so a disconnecting client can be removed from everything it
//! joined in one call.

use std::collections::BTreeSet;

use dashmap::DashMap;
use feralhost_protocol::{AccountId, ConversationId};

use crate::ChatError;

/// A chat room and its current members.
#[derive(Debug, Clone, Default)]
pub struct ChatRoom {
    /// True for direct-message rooms.
    pub private: bool,
    pub members: BTreeSet<AccountId>,
}

/// Tracks room membership for every connected chat client.
///
/// Each map is sharded, so operations on different rooms don't contend.
/// No method holds a guard on one map while touching the other.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: DashMap<ConversationId, ChatRoom>,
    /// Maps each account to the rooms it is joined to.
    memberships: DashMap<AccountId, BTreeSet<ConversationId>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins `account` to `room`, creating the room if needed.
    ///
    /// The private flag is fixed by whoever creates the room. Returns
    /// `false` if the account was already a member.
    pub fn join(&self, account: &AccountId, room: &ConversationId, private: bool) -> bool {
        let joined = self
            .rooms
            .entry(room.clone())
            .or_insert_with(|| {
                tracing::debug!(%room, private, "chat room created");
                ChatRoom {
                    private,
                    members: BTreeSet::new(),
                }
            })
            .members
            .insert(account.clone());

        if joined {
            self.memberships
                .entry(account.clone())
                .or_default()
                .insert(room.clone());
            tracing::debug!(%account, %room, "joined chat room");
        }
        joined
    }

    /// Removes `account` from `room`, destroying the room once empty.
    pub fn leave(&self, account: &AccountId, room: &ConversationId) -> Result<(), ChatError> {
        let removed = self
            .rooms
            .get_mut(room)
            .is_some_and(|mut r| r.members.remove(account));
        if !removed {
            return Err(ChatError::NotInRoom(account.clone(), room.clone()));
        }

        if self.rooms.remove_if(room, |_, r| r.members.is_empty()).is_some() {
            tracing::debug!(%room, "chat room destroyed");
        }
        if let Some(mut rooms) = self.memberships.get_mut(account) {
            rooms.remove(room);
        }
        self.memberships.remove_if(account, |_, rooms| rooms.is_empty());

        tracing::debug!(%account, %room, "left chat room");
        Ok(())
    }

    /// Removes `account` from every room it joined. Returns those rooms.
    pub fn leave_all(&self, account: &AccountId) -> Vec<ConversationId> {
        let rooms: Vec<ConversationId> = self
            .memberships
            .remove(account)
            .map(|(_, rooms)| rooms.into_iter().collect())
            .unwrap_or_default();

        for room in &rooms {
            if let Some(mut r) = self.rooms.get_mut(room) {
                r.members.remove(account);
            }
            self.rooms.remove_if(room, |_, r| r.members.is_empty());
        }
        rooms
    }

    pub fn is_member(&self, account: &AccountId, room: &ConversationId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|r| r.members.contains(account))
    }

    /// True if the room exists and is a direct-message room.
    pub fn is_private(&self, room: &ConversationId) -> bool {
        self.rooms.get(room).is_some_and(|r| r.private)
    }

    /// Snapshot of a room's members, sorted.
    pub fn members(&self, room: &ConversationId) -> Vec<AccountId> {
        self.rooms
            .get(room)
            .map(|r| r.members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Rooms an account is currently joined to.
    pub fn rooms_of(&self, account: &AccountId) -> Vec<ConversationId> {
        self.memberships
            .get(account)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, room: &ConversationId) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
