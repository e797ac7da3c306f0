//! XT framing used by the game server.
//!
//! An XT packet is a `%`-delimited list of string fields:
//!
//! ```text
//! inbound:   %xt%<ext>%<id>%<room>%<f1>%<f2>%...%
//! outbound:  %xt%<id>%-1%<f1>%<f2>%...%
//! ```
//!
//! `<ext>` is the extension name the client addresses (always `o` for the
//! object server) and `<room>` the client's room slot, which the server
//! ignores. Every packet handler sees only the fields after `<room>`.

use uuid::Uuid;

use crate::{ProtocolError, WireFormat};

/// Room slot the server writes into every response.
const RESPONSE_ROOM: &str = "-1";

/// Marker type selecting XT framing in a [`PacketRegistry`](crate::PacketRegistry).
#[derive(Debug, Clone, Copy, Default)]
pub struct XtFormat;

impl WireFormat for XtFormat {
    type Reader = XtReader;
    type Writer = XtWriter;

    fn open(frame: &str) -> Result<(String, XtReader), ProtocolError> {
        let mut parts: Vec<&str> = frame.split('%').collect();

        // A well-formed frame starts and ends with `%`, so the split
        // yields an empty first and last element.
        if parts.len() < 4 || !parts[0].is_empty() || parts[1] != "xt" {
            return Err(ProtocolError::Malformed(format!(
                "not an XT frame: {frame:?}"
            )));
        }
        if parts.last().is_some_and(|last| last.is_empty()) {
            parts.pop();
        }

        let id = parts
            .get(3)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProtocolError::Malformed("missing packet id".into()))?
            .to_string();

        // Skip "", "xt", ext, id and the room slot.
        let fields = parts
            .iter()
            .skip(5)
            .map(|field| field.to_string())
            .collect();

        Ok((id, XtReader::new(fields)))
    }

    fn writer(id: &str) -> XtWriter {
        XtWriter::new(id)
    }

    fn finish(writer: XtWriter) -> Result<String, ProtocolError> {
        Ok(writer.encode())
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Positional, typed access to the data fields of an inbound XT packet.
#[derive(Debug, Clone, Default)]
pub struct XtReader {
    fields: Vec<String>,
    position: usize,
}

impl XtReader {
    /// Creates a reader over already-split data fields.
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            position: 0,
        }
    }

    /// Reads the next field as a string.
    pub fn read_string(&mut self) -> Result<String, ProtocolError> {
        let value = self
            .fields
            .get(self.position)
            .cloned()
            .ok_or(ProtocolError::MissingField(self.position))?;
        self.position += 1;
        Ok(value)
    }

    /// Reads the next field as a signed integer.
    pub fn read_int(&mut self) -> Result<i64, ProtocolError> {
        let position = self.position;
        let raw = self.read_string()?;
        raw.trim().parse().map_err(|_| ProtocolError::BadField {
            position,
            expected: "integer",
            value: raw,
        })
    }

    /// Reads the next field as a boolean (`1`/`0` or `true`/`false`).
    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        let position = self.position;
        let raw = self.read_string()?;
        match raw.as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(ProtocolError::BadField {
                position,
                expected: "boolean",
                value: raw,
            }),
        }
    }

    /// Reads the next field as a UUID.
    pub fn read_uuid(&mut self) -> Result<Uuid, ProtocolError> {
        let position = self.position;
        let raw = self.read_string()?;
        Uuid::parse_str(&raw).map_err(|_| ProtocolError::BadField {
            position,
            expected: "uuid",
            value: raw,
        })
    }

    /// Consumes every remaining field, joined back together with `%`.
    ///
    /// Free-form trailing payloads (chat text, JSON blobs) may themselves
    /// contain `%`, which the framing split apart; this undoes that.
    pub fn read_remaining(&mut self) -> String {
        let rest = self.fields[self.position.min(self.fields.len())..].join("%");
        self.position = self.fields.len();
        rest
    }

    /// Returns `true` if unread fields remain.
    pub fn has_remaining(&self) -> bool {
        self.position < self.fields.len()
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Builds the field list of an outbound XT packet.
#[derive(Debug, Clone)]
pub struct XtWriter {
    fields: Vec<String>,
}

impl XtWriter {
    /// Starts a response for the given packet id.
    pub fn new(id: &str) -> Self {
        Self {
            fields: vec![id.to_string(), RESPONSE_ROOM.to_string()],
        }
    }

    /// Appends a string field.
    pub fn write_string(&mut self, value: &str) -> &mut Self {
        self.fields.push(value.to_string());
        self
    }

    /// Appends an integer field.
    pub fn write_int(&mut self, value: i64) -> &mut Self {
        self.fields.push(value.to_string());
        self
    }

    /// Appends a boolean field as `1` or `0`.
    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.fields.push(if value { "1" } else { "0" }.to_string());
        self
    }

    /// Appends a UUID field in hyphenated form.
    pub fn write_uuid(&mut self, value: &Uuid) -> &mut Self {
        self.fields.push(value.to_string());
        self
    }

    /// Encodes the response as a complete XT frame.
    pub fn encode(&self) -> String {
        format!("%xt%{}%", self.fields.join("%"))
    }
}
