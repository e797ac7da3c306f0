//! Per-connection handlers for the game and chat servers.
//!
//! Each accepted connection gets its own Tokio task running one of these.
//! Both follow the same shape:
//!   1. Receive the first frame → authenticate it → get the AccountId
//!   2. Register the session (one live connection per account)
//!   3. Loop: receive frames → dispatch → send any reply

mod chat;
mod game;

use std::sync::Arc;
use std::time::Duration;

use feralhost_inventory::InventoryStore;
use feralhost_protocol::{AccountId, ProtocolError};
use feralhost_session::Authenticator;
use feralhost_transport::{Connection, TcpConnection};

use crate::FeralError;
use crate::server::ServerState;

pub(crate) use chat::handle_chat_connection;
pub(crate) use game::handle_game_connection;

/// Which of the two servers a session lives on.
#[derive(Debug, Clone, Copy)]
enum ServerKind {
    Game,
    Chat,
}

/// Drop guard that ends an account's session when the handler exits.
///
/// Cleanup happens even if the handler panics. Since `Drop` is
/// synchronous, the async session lock is taken in a spawned task.
struct SessionGuard<A: Authenticator, S: InventoryStore> {
    account: AccountId,
    kind: ServerKind,
    state: Arc<ServerState<A, S>>,
}

impl<A: Authenticator, S: InventoryStore> Drop for SessionGuard<A, S> {
    fn drop(&mut self) {
        if let ServerKind::Chat = self.kind {
            self.state.chat.disconnect(&self.account);
        }

        let account = self.account.clone();
        let kind = self.kind;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let sessions = match kind {
                ServerKind::Game => &state.game_sessions,
                ServerKind::Chat => &state.chat_sessions,
            };
            let _ = sessions.lock().await.disconnect(&account);
        });
    }
}

/// Waits for the first frame of a connection.
async fn first_frame(conn: &TcpConnection, timeout: Duration) -> Result<String, FeralError> {
    match tokio::time::timeout(timeout, conn.recv()).await {
        Ok(Ok(Some(frame))) => Ok(frame),
        Ok(Ok(None)) => Err(ProtocolError::Malformed(
            "connection closed before handshake".into(),
        )
        .into()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(ProtocolError::Malformed("handshake timed out".into()).into()),
    }
}

/// Waits for the next frame of an authenticated connection.
///
/// Returns `None` once the connection should end: clean close, receive
/// error or idle timeout.
async fn next_frame(conn: &TcpConnection, idle: Duration, account: &AccountId) -> Option<String> {
    match tokio::time::timeout(idle, conn.recv()).await {
        Ok(Ok(Some(frame))) => Some(frame),
        Ok(Ok(None)) => {
            tracing::info!(%account, "connection closed cleanly");
            None
        }
        Ok(Err(e)) => {
            tracing::debug!(%account, error = %e, "recv error");
            None
        }
        Err(_) => {
            tracing::info!(%account, "connection timed out");
            None
        }
    }
}
