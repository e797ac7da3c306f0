//! TCP transport with NUL-terminated text frames.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Byte that terminates every frame in both directions.
const FRAME_TERMINATOR: u8 = 0;

/// Largest frame accepted unless configured otherwise (1 MiB).
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024 * 1024;

/// A TCP [`Transport`] that listens for incoming connections.
pub struct TcpTransport {
    listener: TcpListener,
    max_frame_len: usize,
}

impl TcpTransport {
    /// Binds a new transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "TCP transport listening");
        Ok(Self {
            listener,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        })
    }

    /// Sets the largest frame connections will accept.
    pub fn max_frame_len(mut self, max: usize) -> Self {
        self.max_frame_len = max.max(1);
        self
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for TcpTransport {
    type Connection = TcpConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;
        // Frames are small and latency-sensitive.
        let _ = stream.set_nodelay(true);

        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        tracing::debug!(%id, %addr, "accepted TCP connection");

        let (read_half, write_half) = stream.into_split();
        Ok(TcpConnection {
            id,
            peer: addr,
            max_frame_len: self.max_frame_len,
            reader: Mutex::new(BufReader::new(read_half)),
            writer: Mutex::new(write_half),
        })
    }
}

/// A single TCP connection.
///
/// The read and write halves are locked independently, so one task can
/// wait in [`recv`](Connection::recv) while another sends.
pub struct TcpConnection {
    id: ConnectionId,
    peer: SocketAddr,
    max_frame_len: usize,
    reader: Mutex<BufReader<OwnedReadHalf>>,
    writer: Mutex<OwnedWriteHalf>,
}

impl TcpConnection {
    /// Returns the remote peer's address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

impl Connection for TcpConnection {
    type Error = TransportError;

    async fn send(&self, frame: &str) -> Result<(), Self::Error> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(frame.as_bytes())
            .await
            .map_err(TransportError::SendFailed)?;
        writer
            .write_all(&[FRAME_TERMINATOR])
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)
    }

    async fn recv(&self) -> Result<Option<String>, Self::Error> {
        let mut reader = self.reader.lock().await;
        // One extra byte leaves room for the terminator of a frame that is
        // exactly `max_frame_len` long.
        let limit = self.max_frame_len as u64 + 1;
        loop {
            let mut buf = Vec::new();
            let n = (&mut *reader)
                .take(limit)
                .read_until(FRAME_TERMINATOR, &mut buf)
                .await
                .map_err(TransportError::ReceiveFailed)?;

            if n == 0 {
                return Ok(None);
            }
            if buf.last() != Some(&FRAME_TERMINATOR) {
                if (buf.len() as u64) < limit {
                    tracing::debug!(id = %self.id, "peer closed mid-frame");
                    return Ok(None);
                }
                tracing::warn!(
                    id = %self.id,
                    max = self.max_frame_len,
                    "dropping oversized frame"
                );
                if !discard_frame(&mut reader, limit).await? {
                    return Ok(None);
                }
                continue;
            }
            buf.pop();

            // Stray terminators between frames carry nothing.
            if buf.is_empty() {
                continue;
            }

            match String::from_utf8(buf) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    tracing::warn!(
                        id = %self.id,
                        len = e.as_bytes().len(),
                        "dropping frame that is not valid UTF-8"
                    );
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(TransportError::SendFailed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Reads and throws away the rest of the current frame.
///
/// Returns `false` if the peer closed before the terminator arrived.
async fn discard_frame(
    reader: &mut BufReader<OwnedReadHalf>,
    chunk: u64,
) -> Result<bool, TransportError> {
    let mut scratch = Vec::new();
    loop {
        scratch.clear();
        let n = (&mut *reader)
            .take(chunk)
            .read_until(FRAME_TERMINATOR, &mut scratch)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            return Ok(false);
        }
        if scratch.last() == Some(&FRAME_TERMINATOR) {
            return Ok(true);
        }
    }
}
