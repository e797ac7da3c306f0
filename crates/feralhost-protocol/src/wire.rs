//! The `WireFormat` trait: how a raw text frame becomes fields and back.
//!
//! The game server and the chat server frame packets differently (XT
//! field lists versus JSON objects), but both follow the same discipline:
//! the frame yields one identifier plus a reader over the remaining
//! fields, and a response is built through a writer that is then encoded
//! back into a single frame. The dispatcher only talks to this trait, so
//! the same [`PacketRegistry`](crate::PacketRegistry) drives both servers.

use crate::ProtocolError;

/// A text framing scheme for one protocol.
///
/// ## Trait bounds explained
///
/// - `Send + Sync + 'static` → the format is a zero-sized marker type
///   shared by every connection task for the life of the server.
///
/// The reader and writer are plain owned values. A fresh pair is created
/// for every packet, so nothing leaks from one frame into the next.
pub trait WireFormat: Send + Sync + 'static {
    /// Positional or keyed access to the fields after the identifier.
    type Reader;

    /// Accumulates the fields of a response.
    type Writer;

    /// Splits a raw frame into its identifier and a reader over the rest.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the frame has no recognizable
    /// identifier. The dispatcher reports this as malformed input.
    fn open(frame: &str) -> Result<(String, Self::Reader), ProtocolError>;

    /// Starts a response for the packet with the given identifier.
    fn writer(id: &str) -> Self::Writer;

    /// Encodes a finished response into a single frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn finish(writer: Self::Writer) -> Result<String, ProtocolError>;
}
