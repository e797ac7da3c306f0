//! Packet framing and dispatch for feralhost.
//!
//! This crate defines the "language" the game client speaks to both of
//! our servers:
//!
//! - **Wire formats** ([`WireFormat`], [`XtFormat`], [`ChatFormat`]):
//!   how a raw text frame is split into an identifier plus fields, and
//!   how a response is encoded back.
//! - **Packets** ([`Packet`], [`PacketRegistry`], [`Dispatch`]): the
//!   prototype/fresh-instance discipline every packet type follows.
//! - **Identity types** ([`AccountId`], [`ConversationId`]) and the
//!   name-based UUID derivation the client relies on ([`name_uuid`]).
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (frames) → Protocol (id + reader) → Packet handler (session state)
//!                    ← Protocol (writer → frame) ←
//! ```
//!
//! The protocol layer doesn't know about sockets, inventories, or chat
//! rooms. Handlers receive whatever context type the server hands them.

mod chat;
mod error;
mod packet;
mod types;
mod wire;
mod xt;

pub use chat::{COMMAND_KEY, ChatFormat, ChatReader, ChatWriter, EVENT_KEY};
pub use error::ProtocolError;
pub use packet::{Dispatch, Packet, PacketRegistry};
pub use types::{AccountId, ConversationId, name_uuid};
pub use wire::WireFormat;
pub use xt::{XtFormat, XtReader, XtWriter};
