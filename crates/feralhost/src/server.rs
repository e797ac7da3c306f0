//! `FeralServer` builder and accept loops.
//!
//! This is the entry point for running feralhost. It ties all the layers
//! together: transport → protocol → session → inventory / chat.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use feralhost_catalog::Catalogs;
use feralhost_chat::ChatState;
use feralhost_inventory::InventoryStore;
use feralhost_protocol::{ChatFormat, Packet, XtFormat};
use feralhost_session::{
    Authenticator, ConfirmationOutcome, SessionManager, TimedActions, resolve_confirmation,
};
use feralhost_transport::{TcpTransport, Transport};
use tokio::sync::Mutex;

use crate::chat::{ChatContext, ChatPackets, chat_packets};
use crate::game::{GameContext, GamePackets, game_packets};
use crate::handler::{handle_chat_connection, handle_game_connection};
use crate::{FeralError, ServerConfig};

/// How often expired timed actions are dropped.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
pub(crate) struct ServerState<A, S> {
    pub(crate) config: ServerConfig,
    pub(crate) auth: A,
    pub(crate) store: S,
    pub(crate) catalogs: Arc<Catalogs>,
    pub(crate) chat: Arc<ChatState>,
    pub(crate) timed_actions: Arc<TimedActions>,
    pub(crate) game_sessions: Mutex<SessionManager>,
    pub(crate) chat_sessions: Mutex<SessionManager>,
    pub(crate) game_packets: GamePackets,
    pub(crate) chat_packets: ChatPackets,
}

// ---------------------------------------------------------------------------
// Confirmations
// ---------------------------------------------------------------------------

/// Handle for the login-confirmation workflow.
///
/// Whatever delivers confirmation buttons to players (a chat bot, a web
/// page) issues a token per pending login and resolves button presses
/// through this handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Confirmations {
    actions: Arc<TimedActions>,
    ttl: Duration,
}

impl Confirmations {
    /// Registers `on_accept` to run if the login is confirmed within the
    /// configured TTL. Returns the token to embed in the button id.
    pub fn issue<F>(&self, on_accept: F) -> String
    where
        F: FnOnce() + Send + 'static,
    {
        self.actions.issue(self.ttl, on_accept)
    }

    /// Resolves a button press. See [`resolve_confirmation`].
    pub fn resolve(&self, interaction_id: &str, requester: &str) -> Option<ConfirmationOutcome> {
        resolve_confirmation(&self.actions, interaction_id, requester)
    }

    /// Number of confirmations still waiting for a press.
    pub fn pending(&self) -> usize {
        self.actions.len()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a feralhost server.
///
/// # Example
///
/// ```rust,ignore
/// use feralhost::prelude::*;
///
/// let server = FeralServerBuilder::new()
///     .config(ServerConfig::load("feralhost.toml")?)
///     .build(my_auth, MemoryStore::new())
///     .await?;
/// server.run().await
/// ```
pub struct FeralServerBuilder {
    config: ServerConfig,
    catalogs: Option<Catalogs>,
    game_packets: GamePackets,
    chat_packets: ChatPackets,
}

impl FeralServerBuilder {
    /// Creates a new builder with default settings and the standard
    /// packet sets.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            catalogs: None,
            game_packets: game_packets(),
            chat_packets: chat_packets(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address the game server binds to.
    pub fn game_addr(mut self, addr: &str) -> Self {
        self.config.game_addr = addr.to_string();
        self
    }

    /// Sets the address the chat server binds to.
    pub fn chat_addr(mut self, addr: &str) -> Self {
        self.config.chat_addr = addr.to_string();
        self
    }

    /// Uses already-loaded catalogs instead of reading
    /// `config.catalog_dir`.
    pub fn catalogs(mut self, catalogs: Catalogs) -> Self {
        self.catalogs = Some(catalogs);
        self
    }

    /// Registers an additional game packet, replacing any standard one
    /// with the same identifier.
    pub fn game_packet(mut self, packet: Box<dyn Packet<XtFormat, GameContext>>) -> Self {
        self.game_packets.register(packet);
        self
    }

    /// Registers an additional chat packet.
    pub fn chat_packet(mut self, packet: Box<dyn Packet<ChatFormat, ChatContext>>) -> Self {
        self.chat_packets.register(packet);
        self
    }

    /// Loads the catalogs and binds both listeners.
    pub async fn build<A, S>(self, auth: A, store: S) -> Result<FeralServer<A, S>, FeralError>
    where
        A: Authenticator,
        S: InventoryStore,
    {
        let catalogs = match (self.catalogs, &self.config.catalog_dir) {
            (Some(catalogs), _) => catalogs,
            (None, Some(dir)) => Catalogs::load_dir(dir)?,
            (None, None) => {
                tracing::warn!("no catalog directory configured, catalogs are empty");
                Catalogs::empty()
            }
        };

        let game = TcpTransport::bind(&self.config.game_addr)
            .await?
            .max_frame_len(self.config.max_frame_len);
        let chat = TcpTransport::bind(&self.config.chat_addr)
            .await?
            .max_frame_len(self.config.max_frame_len);

        let state = Arc::new(ServerState {
            config: self.config,
            auth,
            store,
            catalogs: Arc::new(catalogs),
            chat: Arc::new(ChatState::new()),
            timed_actions: Arc::new(TimedActions::new()),
            game_sessions: Mutex::new(SessionManager::new()),
            chat_sessions: Mutex::new(SessionManager::new()),
            game_packets: self.game_packets,
            chat_packets: self.chat_packets,
        });

        Ok(FeralServer { game, chat, state })
    }
}

impl Default for FeralServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A bound feralhost server: the game listener and the chat listener.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FeralServer<A, S> {
    game: TcpTransport,
    chat: TcpTransport,
    state: Arc<ServerState<A, S>>,
}

impl<A, S> FeralServer<A, S>
where
    A: Authenticator,
    S: InventoryStore,
{
    /// Returns the address the game server is bound to.
    pub fn game_addr(&self) -> std::io::Result<SocketAddr> {
        self.game.local_addr()
    }

    /// Returns the address the chat server is bound to.
    pub fn chat_addr(&self) -> std::io::Result<SocketAddr> {
        self.chat.local_addr()
    }

    /// Returns a handle for issuing and resolving login confirmations.
    pub fn confirmations(&self) -> Confirmations {
        Confirmations {
            actions: Arc::clone(&self.state.timed_actions),
            ttl: self.state.config.confirmation_ttl(),
        }
    }

    /// Returns the chat state shared by every chat connection.
    pub fn chat_state(&self) -> Arc<ChatState> {
        Arc::clone(&self.state.chat)
    }

    /// Runs both accept loops.
    ///
    /// Spawns a handler task for each accepted connection. Runs until
    /// the process is terminated.
    pub async fn run(self) -> Result<(), FeralError> {
        let FeralServer { game, chat, state } = self;
        tracing::info!(
            game = ?game.local_addr().ok(),
            chat = ?chat.local_addr().ok(),
            "feralhost server running"
        );

        let purge = tokio::spawn(purge_expired_actions(Arc::clone(&state.timed_actions)));
        tokio::select! {
            () = accept_game(game, Arc::clone(&state)) => {}
            () = accept_chat(chat, Arc::clone(&state)) => {}
        }
        purge.abort();
        Ok(())
    }
}

async fn accept_game<A, S>(mut transport: TcpTransport, state: Arc<ServerState<A, S>>)
where
    A: Authenticator,
    S: InventoryStore,
{
    loop {
        match transport.accept().await {
            Ok(conn) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    if let Err(e) = handle_game_connection(conn, state).await {
                        tracing::debug!(error = %e, "game connection ended with error");
                    }
                });
            }
            Err(e) => tracing::error!(error = %e, "game accept failed"),
        }
    }
}

async fn accept_chat<A, S>(mut transport: TcpTransport, state: Arc<ServerState<A, S>>)
where
    A: Authenticator,
    S: InventoryStore,
{
    loop {
        match transport.accept().await {
            Ok(conn) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    if let Err(e) = handle_chat_connection(conn, state).await {
                        tracing::debug!(error = %e, "chat connection ended with error");
                    }
                });
            }
            Err(e) => tracing::error!(error = %e, "chat accept failed"),
        }
    }
}

async fn purge_expired_actions(actions: Arc<TimedActions>) {
    let mut interval = tokio::time::interval(PURGE_INTERVAL);
    loop {
        interval.tick().await;
        let purged = actions.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "expired timed actions dropped");
        }
    }
}
