//! Identity types shared by every layer of feralhost.
//!
//! The game identifies players by account id (a UUID string issued by
//! the account service) and chat rooms/conversations by opaque string
//! ids chosen by the client. Both travel on the wire as plain strings.

use serde::{Deserialize, Serialize};

use std::fmt;

use md5::{Digest, Md5};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's account identifier.
///
/// This is a "newtype wrapper" around `String`. You can't accidentally
/// pass a `ConversationId` where an `AccountId` is expected even though
/// both are strings underneath.
///
/// `#[serde(transparent)]` serializes this as the bare string, which is
/// what the client sends and expects back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a chat room or private conversation.
///
/// A direct-message room and its conversation history share the same id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Name-based UUIDs
// ---------------------------------------------------------------------------

/// Derives a version-3 UUID from raw bytes, with no namespace.
///
/// The client derives dye record ids and chat message ids this way:
/// MD5 over the bytes, then the RFC 4122 version and variant bits are
/// stamped in. `Uuid::new_v3` always prepends a namespace, so it can't
/// reproduce these ids; we hash directly and let
/// `Builder::from_md5_bytes` set the bits.
pub fn name_uuid(bytes: &[u8]) -> Uuid {
    let digest: [u8; 16] = Md5::digest(bytes).into();
    uuid::Builder::from_md5_bytes(digest).into_uuid()
}
