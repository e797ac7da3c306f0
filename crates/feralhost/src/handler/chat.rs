use std::sync::Arc;

use feralhost_inventory::InventoryStore;
use feralhost_protocol::{AccountId, ChatFormat, ChatWriter, Dispatch, ProtocolError, WireFormat};
use feralhost_session::Authenticator;
use feralhost_transport::{Connection, TcpConnection};
use serde_json::Value;
use tokio::sync::mpsc;

use super::{ServerKind, SessionGuard, first_frame, next_frame};
use crate::FeralError;
use crate::chat::{ChatContext, SESSION_START};
use crate::server::ServerState;

/// Handles a single chat connection from accept to close.
///
/// Everything sent to the client (replies and room events alike) goes
/// through one outbound channel drained by a writer task, so frames
/// never interleave.
pub(crate) async fn handle_chat_connection<A, S>(
    conn: TcpConnection,
    state: Arc<ServerState<A, S>>,
) -> Result<(), FeralError>
where
    A: Authenticator,
    S: InventoryStore,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), "handling new chat connection");

    // --- Step 1: sessions.start handshake ---
    let account = match perform_handshake(&conn, &state).await {
        Ok(account) => account,
        Err(e) => {
            let _ = conn.send(&session_start_reply(false)?).await;
            let _ = conn.close().await;
            return Err(e);
        }
    };

    let _guard = SessionGuard {
        account: account.clone(),
        kind: ServerKind::Chat,
        state: Arc::clone(&state),
    };
    let (outbox, mut outbound) = mpsc::unbounded_channel::<String>();
    state.chat.connect(account.clone(), outbox.clone())?;
    conn.send(&session_start_reply(true)?).await?;
    tracing::info!(%conn_id, %account, "player joined chat server");

    // --- Step 2: Writer task ---
    let writer = {
        let conn = Arc::clone(&conn);
        tokio::spawn(async move {
            while let Some(frame) = outbound.recv().await {
                if let Err(e) = conn.send(&frame).await {
                    tracing::debug!(error = %e, "chat send failed");
                    break;
                }
            }
        })
    };

    // --- Step 3: Packet loop ---
    let mut context = ChatContext::new(account.clone(), Arc::clone(&state.chat));
    let idle = state.config.idle_timeout();
    while let Some(frame) = next_frame(&conn, idle, &account).await {
        if let Dispatch::Reply(response) = state.chat_packets.dispatch(&frame, &mut context) {
            if outbox.send(response).is_err() {
                break;
            }
        }
    }

    writer.abort();
    let _ = conn.close().await;
    Ok(())
    // _guard drops here → leaves every room, ends the session.
}

/// Reads `sessions.start`, authenticates its token and registers the
/// session.
async fn perform_handshake<A, S>(
    conn: &TcpConnection,
    state: &Arc<ServerState<A, S>>,
) -> Result<AccountId, FeralError>
where
    A: Authenticator,
    S: InventoryStore,
{
    let frame = first_frame(conn, state.config.handshake_timeout()).await?;
    let (id, reader) = ChatFormat::open(&frame)?;
    if id != SESSION_START {
        return Err(ProtocolError::Malformed(format!(
            "first chat packet must be {SESSION_START}, got {id}"
        ))
        .into());
    }

    let token = reader.read_nested_string("params", "auth_token")?;
    let account = state.auth.authenticate(&token).await?;
    state.chat_sessions.lock().await.create(account.clone())?;
    Ok(account)
}

fn session_start_reply(success: bool) -> Result<String, FeralError> {
    let mut writer = ChatWriter::new(SESSION_START);
    writer.put("success", Value::Bool(success));
    Ok(writer.encode()?)
}
