//! Chat rooms and direct messages for feralhost.
//!
//! The chat server keeps two independent directories: which connected
//! clients are joined to which rooms, and the message history of every
//! private (direct-message) conversation. A DM room and its
//! conversation share the same id.
//!
//! # Key types
//!
//! - [`RoomDirectory`]: room membership, rooms live while occupied
//! - [`DmManager`]: private conversations and their ordered history
//! - [`ChatMessage`]: a posted message and its wire views
//! - [`ChatState`]: both directories plus the connected-client channels

mod dm;
mod error;
mod message;
mod room;
mod state;

pub use dm::{DmManager, PrivateConversation};
pub use error::ChatError;
pub use message::{
    ChatMessage, HistoryEntry, MessageView, PRIVATE_CONVERSATION, ROOM_CONVERSATION,
};
pub use room::{ChatRoom, RoomDirectory};
pub use state::{ChatState, ClientSender};
