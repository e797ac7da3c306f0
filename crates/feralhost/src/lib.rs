//! # feralhost
//!
//! A self-hosted game server and chat server for the EmuFeral client.
//!
//! The game server speaks XT over TCP and edits each player's inventory
//! documents; the chat server speaks JSON over TCP and handles rooms and
//! direct messages. Both share one packet discipline: every frame is
//! dispatched to a fresh instance of the packet registered under its
//! identifier.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use feralhost::prelude::*;
//!
//! # async fn start() -> Result<(), FeralError> {
//! feralhost::init_tracing("info");
//! let config = ServerConfig::load("feralhost.toml")?;
//! let server = FeralServerBuilder::new()
//!     .config(config)
//!     .build(TokenDirectory::new(), MemoryStore::new())
//!     .await?;
//! server.run().await
//! # }
//! ```

pub mod chat;
mod config;
mod error;
pub mod game;
mod handler;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::FeralError;
pub use server::{Confirmations, FeralServer, FeralServerBuilder};

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber that logs to stderr.
///
/// `RUST_LOG` takes precedence over `default_directive`. Calling this
/// more than once is harmless.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Convenient re-exports of the types a server embedder needs.
pub mod prelude {
    pub use crate::chat::{ChatContext, ChatPackets};
    pub use crate::game::{GameContext, GamePackets};
    pub use crate::{
        Confirmations, FeralError, FeralServer, FeralServerBuilder, ServerConfig, init_tracing,
    };

    pub use feralhost_catalog::Catalogs;
    pub use feralhost_chat::ChatState;
    pub use feralhost_inventory::{InventoryAccessor, InventoryStore, MemoryStore, PlayerInventory};
    pub use feralhost_protocol::{
        AccountId, ChatFormat, ChatReader, ChatWriter, ConversationId, Dispatch, Packet,
        ProtocolError, XtFormat, XtReader, XtWriter,
    };
    pub use feralhost_session::{
        Authenticator, ConfirmationOutcome, SessionError, TimedActions, TokenDirectory,
    };
}
