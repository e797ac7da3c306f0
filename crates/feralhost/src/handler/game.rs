use std::sync::Arc;

use feralhost_inventory::{InventoryAccessor, InventoryStore, flush_dirty};
use feralhost_protocol::Dispatch;
use feralhost_session::Authenticator;
use feralhost_transport::{Connection, TcpConnection};

use super::{ServerKind, SessionGuard, first_frame, next_frame};
use crate::FeralError;
use crate::game::GameContext;
use crate::server::ServerState;

/// Handles a single game connection from accept to close.
///
/// The first frame is the raw session token. After that every frame is
/// an XT packet. Dirty inventory documents are saved after each packet
/// that changed them, and once more when the connection ends.
pub(crate) async fn handle_game_connection<A, S>(
    conn: TcpConnection,
    state: Arc<ServerState<A, S>>,
) -> Result<(), FeralError>
where
    A: Authenticator,
    S: InventoryStore,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), "handling new game connection");

    // --- Step 1: Authenticate ---
    let token = first_frame(&conn, state.config.handshake_timeout()).await?;
    let account = match state.auth.authenticate(token.trim()).await {
        Ok(account) => account,
        Err(e) => {
            let _ = conn.close().await;
            return Err(e.into());
        }
    };

    // Create session and guard together: if creation fails no guard is
    // needed, if it succeeds the guard is immediately active.
    let created = state.game_sessions.lock().await.create(account.clone()).map(|_| ());
    if let Err(e) = created {
        let _ = conn.close().await;
        return Err(e.into());
    }
    let _guard = SessionGuard {
        account: account.clone(),
        kind: ServerKind::Game,
        state: Arc::clone(&state),
    };
    tracing::info!(%conn_id, %account, "player joined game server");

    // --- Step 2: Load the player's inventory ---
    let inventory = state.store.load(&account)?;
    let mut context = GameContext::new(
        account.clone(),
        InventoryAccessor::new(inventory, Arc::clone(&state.catalogs)),
    );

    // --- Step 3: Packet loop ---
    let idle = state.config.idle_timeout();
    while let Some(frame) = next_frame(&conn, idle, &account).await {
        if let Dispatch::Reply(response) = state.game_packets.dispatch(&frame, &mut context) {
            conn.send(&response).await?;
        }
        flush(&mut context, &state);
    }

    flush(&mut context, &state);
    let _ = conn.close().await;
    Ok(())
    // _guard drops here → session disconnect fires.
}

/// Saves the documents the last packet dirtied. A failed save is logged
/// and retried after the next packet.
fn flush<A: Authenticator, S: InventoryStore>(context: &mut GameContext, state: &ServerState<A, S>) {
    if !context.inventory().is_dirty() {
        return;
    }
    let account = context.account().clone();
    if let Err(e) = flush_dirty(context.inventory_mut(), &account, &state.store) {
        tracing::warn!(%account, error = %e, "inventory flush failed");
    }
}
