//! Error types for the protocol layer.
//!
//! Each crate in feralhost defines its own error enum. A `ProtocolError`
//! always means a frame could not be split, read, or written; it never
//! describes what a handler did with a well-formed packet.

/// Errors that can occur while framing or parsing packets.
///
/// None of these are fatal to a connection. The dispatcher treats every
/// variant raised during `parse` as "malformed input" and drops the packet.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A chat frame was not valid JSON, or a value could not be
    /// converted to the requested type.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// A response could not be serialized.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The frame is structurally invalid (wrong header, missing
    /// identifier, not an object, ...).
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// A reader ran out of positional fields.
    #[error("missing field at position {0}")]
    MissingField(usize),

    /// A keyed field is absent or has the wrong JSON type.
    #[error("missing or invalid field `{0}`")]
    InvalidField(String),

    /// A positional field could not be parsed as the requested type.
    #[error("field {position} is not a valid {expected}: {value:?}")]
    BadField {
        position: usize,
        expected: &'static str,
        value: String,
    },
}
