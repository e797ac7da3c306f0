//! Shared helpers for the server integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use feralhost::prelude::*;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

// =========================================================================
// Mock authenticator and packets
// =========================================================================

/// Accepts any token as the account id, except `"bad"`.
pub struct TestAuth;

impl Authenticator for TestAuth {
    async fn authenticate(&self, token: &str) -> Result<AccountId, SessionError> {
        if token.is_empty() || token == "bad" {
            return Err(SessionError::AuthFailed("rejected".into()));
        }
        Ok(AccountId::from(token))
    }
}

/// `tdye`: grants one dye and answers with its record id.
#[derive(Default)]
pub struct GrantDye {
    def_id: i64,
    record_id: String,
}

impl Packet<XtFormat, GameContext> for GrantDye {
    fn id(&self) -> &'static str {
        "tdye"
    }

    fn instantiate(&self) -> Box<dyn Packet<XtFormat, GameContext>> {
        Box::new(GrantDye::default())
    }

    fn parse(&mut self, reader: &mut XtReader) -> Result<(), ProtocolError> {
        self.def_id = reader.read_int()?;
        Ok(())
    }

    fn handle(&mut self, context: &mut GameContext) -> bool {
        self.record_id = context.inventory_mut().add_dye(self.def_id);
        true
    }

    fn build(&self, writer: &mut XtWriter) -> Result<(), ProtocolError> {
        writer.write_string(&self.record_id);
        Ok(())
    }
}

// =========================================================================
// Server
// =========================================================================

pub struct TestServer {
    pub game: SocketAddr,
    pub chat: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub chat_state: Arc<ChatState>,
    pub confirmations: Confirmations,
}

/// Configuration every test server starts from: random ports.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        game_addr: "127.0.0.1:0".into(),
        chat_addr: "127.0.0.1:0".into(),
        confirmation_ttl_secs: 60,
        ..ServerConfig::default()
    }
}

/// Starts a server on random ports.
pub async fn start_server() -> TestServer {
    start_server_with(test_config()).await
}

pub async fn start_server_with(config: ServerConfig) -> TestServer {
    let store = Arc::new(MemoryStore::new());
    let server = FeralServerBuilder::new()
        .config(config)
        .catalogs(Catalogs::empty())
        .game_packet(Box::new(GrantDye::default()))
        .build(TestAuth, Arc::clone(&store))
        .await
        .expect("server should build");

    let test_server = TestServer {
        game: server.game_addr().expect("game addr"),
        chat: server.chat_addr().expect("chat addr"),
        store,
        chat_state: server.chat_state(),
        confirmations: server.confirmations(),
    };

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loops a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    test_server
}

// =========================================================================
// Client
// =========================================================================

/// A raw NUL-framed TCP client.
pub struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("should connect");
        let (read, write) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer: write,
        }
    }

    pub async fn send(&mut self, frame: &str) {
        self.send_bytes(frame.as_bytes()).await;
    }

    /// Sends raw bytes as one frame, valid UTF-8 or not.
    pub async fn send_bytes(&mut self, frame: &[u8]) {
        self.writer.write_all(frame).await.expect("send");
        self.writer.write_all(&[0]).await.expect("send terminator");
        self.writer.flush().await.expect("flush");
    }

    /// Next frame, or `None` once the server closed the connection.
    pub async fn recv(&mut self) -> Option<String> {
        let mut buf = Vec::new();
        let read = tokio::time::timeout(Duration::from_secs(5), self.reader.read_until(0, &mut buf))
            .await
            .expect("server should answer within 5s")
            .ok()?;
        if read == 0 || buf.last() != Some(&0) {
            return None;
        }
        buf.pop();
        Some(String::from_utf8(buf).expect("utf-8 frame"))
    }

    /// Like `recv`, but `Err` if nothing arrives within `ms`.
    pub async fn recv_within(&mut self, ms: u64) -> Result<Option<String>, ()> {
        tokio::time::timeout(Duration::from_millis(ms), self.recv())
            .await
            .map_err(|_| ())
    }

    pub async fn recv_json(&mut self) -> serde_json::Value {
        let frame = self.recv().await.expect("expected a frame");
        serde_json::from_str(&frame).expect("json frame")
    }
}

/// Connects to the game server and presents `token`.
pub async fn game_login(addr: SocketAddr, token: &str) -> Client {
    let mut client = Client::connect(addr).await;
    client.send(token).await;
    client
}

/// Connects to the chat server and completes `sessions.start`.
pub async fn chat_login(addr: SocketAddr, token: &str) -> Client {
    let mut client = Client::connect(addr).await;
    client
        .send(&format!(
            r#"{{"cmd":"sessions.start","params":{{"auth_token":"{token}"}}}}"#
        ))
        .await;
    let reply = client.recv_json().await;
    assert_eq!(reply["eventId"], "sessions.start");
    assert_eq!(reply["success"], true, "chat login for {token} failed");
    client
}

/// Polls `condition` until it holds or a second has passed.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
