//! Unified error type for the feralhost server.

use feralhost_catalog::CatalogError;
use feralhost_chat::ChatError;
use feralhost_inventory::InventoryError;
use feralhost_protocol::ProtocolError;
use feralhost_session::SessionError;
use feralhost_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically. None of these stop the server: a connection
/// handler that fails only ends its own connection.
#[derive(Debug, thiserror::Error)]
pub enum FeralError {
    /// Connection, send or receive failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be framed, parsed or encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Authentication or session bookkeeping failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Reference data could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An inventory could not be loaded or saved.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
