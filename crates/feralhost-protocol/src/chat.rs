//! JSON framing used by the chat server.
//!
//! Each chat frame is one JSON object. The request identifier lives in
//! the `cmd` member and every response carries it back as `eventId`:
//!
//! ```text
//! → {"cmd": "conversations.history", "conversationId": "c1"}
//! ← {"eventId": "conversations.history", "success": true, "messages": []}
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{ProtocolError, WireFormat};

/// Member holding the request identifier.
pub const COMMAND_KEY: &str = "cmd";

/// Member holding the response identifier.
pub const EVENT_KEY: &str = "eventId";

/// Marker type selecting chat JSON framing in a
/// [`PacketRegistry`](crate::PacketRegistry).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatFormat;

impl WireFormat for ChatFormat {
    type Reader = ChatReader;
    type Writer = ChatWriter;

    fn open(frame: &str) -> Result<(String, ChatReader), ProtocolError> {
        let value: Value =
            serde_json::from_str(frame).map_err(ProtocolError::Decode)?;
        let Value::Object(object) = value else {
            return Err(ProtocolError::Malformed(
                "chat frame is not a JSON object".into(),
            ));
        };
        let id = object
            .get(COMMAND_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::Malformed("missing `cmd`".into()))?
            .to_string();
        Ok((id, ChatReader::new(object)))
    }

    fn writer(id: &str) -> ChatWriter {
        ChatWriter::new(id)
    }

    fn finish(writer: ChatWriter) -> Result<String, ProtocolError> {
        writer.encode()
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Keyed, typed access to the members of an inbound chat frame.
#[derive(Debug, Clone, Default)]
pub struct ChatReader {
    object: Map<String, Value>,
}

impl ChatReader {
    /// Wraps an already-parsed JSON object.
    pub fn new(object: Map<String, Value>) -> Self {
        Self { object }
    }

    /// Reads a string member.
    pub fn read_string(&self, key: &str) -> Result<String, ProtocolError> {
        self.object
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProtocolError::InvalidField(key.to_string()))
    }

    /// Reads a string member nested one level down, e.g. `params.auth_token`.
    pub fn read_nested_string(
        &self,
        parent: &str,
        key: &str,
    ) -> Result<String, ProtocolError> {
        self.object
            .get(parent)
            .and_then(|inner| inner.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProtocolError::InvalidField(format!("{parent}.{key}")))
    }

    /// Reads an optional string member; `None` if absent or not a string.
    pub fn read_optional_string(&self, key: &str) -> Option<String> {
        self.object.get(key).and_then(Value::as_str).map(str::to_string)
    }

    /// Deserializes a member into any serde type.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T, ProtocolError> {
        let value = self
            .object
            .get(key)
            .cloned()
            .ok_or_else(|| ProtocolError::InvalidField(key.to_string()))?;
        serde_json::from_value(value).map_err(ProtocolError::Decode)
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Builds an outbound chat frame.
#[derive(Debug, Clone)]
pub struct ChatWriter {
    object: Map<String, Value>,
}

impl ChatWriter {
    /// Starts a response whose `eventId` is the given identifier.
    pub fn new(id: &str) -> Self {
        let mut object = Map::new();
        object.insert(EVENT_KEY.to_string(), Value::String(id.to_string()));
        Self { object }
    }

    /// Sets a member to an arbitrary JSON value.
    pub fn put(&mut self, key: &str, value: Value) -> &mut Self {
        self.object.insert(key.to_string(), value);
        self
    }

    /// Sets a member from any serializable value.
    pub fn put_serialized<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<&mut Self, ProtocolError> {
        let value = serde_json::to_value(value).map_err(ProtocolError::Encode)?;
        self.object.insert(key.to_string(), value);
        Ok(self)
    }

    /// Encodes the frame as compact JSON.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(&self.object).map_err(ProtocolError::Encode)
    }

    /// Returns the object built so far.
    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }
}
