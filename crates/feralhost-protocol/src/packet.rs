//! Packet prototypes and the registry that dispatches frames to them.
//!
//! Every packet type registers one *prototype* under its identifier. When
//! a frame arrives, the registry looks the identifier up and asks the
//! prototype for a brand-new instance. That instance parses the frame,
//! runs its handler against the connection's context, and optionally
//! writes a response. Instances are never reused, so no packet can carry
//! state from one frame into another.

use std::collections::HashMap;

use crate::{ProtocolError, WireFormat};

/// One packet type of a protocol.
///
/// `F` is the wire format the packet is framed in and `C` the
/// per-connection context its handler mutates (a game session, a chat
/// client, ...).
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → prototypes live in a registry shared by every
///   connection task.
/// - `'static` → the registry owns its prototypes for the life of the
///   server.
pub trait Packet<F: WireFormat, C>: Send + Sync + 'static {
    /// The stable identifier this packet is registered under.
    ///
    /// This is part of the wire contract with the client and must never
    /// change.
    fn id(&self) -> &'static str;

    /// Creates a fresh, empty instance of this packet type.
    fn instantiate(&self) -> Box<dyn Packet<F, C>>;

    /// Reads the packet's fields.
    ///
    /// # Errors
    /// Any error marks the frame as malformed; it is dropped without a
    /// response and the connection stays open.
    fn parse(&mut self, reader: &mut F::Reader) -> Result<(), ProtocolError>;

    /// Runs the packet's side effects against the connection context.
    ///
    /// Returns `true` if a response should be built and sent. `false`
    /// means the dispatcher sends nothing, even if `build` would have
    /// written fields.
    fn handle(&mut self, context: &mut C) -> bool;

    /// Writes the response fields. Only called when `handle` returned
    /// `true`.
    ///
    /// # Errors
    /// An encoding failure drops the response.
    fn build(&self, writer: &mut F::Writer) -> Result<(), ProtocolError>;
}

/// What the registry did with a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The packet was handled and produced this response frame.
    Reply(String),

    /// The packet was handled and asked for no response.
    NoReply,

    /// The frame could not be framed or parsed. `id` is the identifier
    /// if one could be extracted.
    Malformed { id: Option<String> },

    /// No packet is registered under this identifier.
    Unknown { id: String },
}

/// Maps identifiers to packet prototypes for one protocol.
pub struct PacketRegistry<F: WireFormat, C> {
    prototypes: HashMap<&'static str, Box<dyn Packet<F, C>>>,
}

impl<F: WireFormat, C: 'static> PacketRegistry<F, C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            prototypes: HashMap::new(),
        }
    }

    /// Registers a prototype under its own identifier.
    ///
    /// Registering a second prototype with the same identifier replaces
    /// the first.
    pub fn register(&mut self, prototype: Box<dyn Packet<F, C>>) -> &mut Self {
        let id = prototype.id();
        if self.prototypes.insert(id, prototype).is_some() {
            tracing::warn!(packet = id, "packet prototype replaced");
        }
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, prototype: Box<dyn Packet<F, C>>) -> Self {
        self.register(prototype);
        self
    }

    /// Returns `true` if a prototype is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.prototypes.contains_key(id)
    }

    /// Returns the number of registered packet types.
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Returns `true` if no packet types are registered.
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Frames, parses, handles, and (optionally) answers one raw frame.
    ///
    /// Never fails: every problem with the frame is reported through the
    /// returned [`Dispatch`] so the caller can log it and keep the
    /// connection open.
    pub fn dispatch(&self, frame: &str, context: &mut C) -> Dispatch {
        let (id, mut reader) = match F::open(frame) {
            Ok(opened) => opened,
            Err(e) => {
                tracing::debug!(error = %e, "dropping unframeable packet");
                return Dispatch::Malformed { id: None };
            }
        };

        let Some(prototype) = self.prototypes.get(id.as_str()) else {
            tracing::warn!(packet = %id, "unknown packet identifier, ignoring");
            return Dispatch::Unknown { id };
        };

        let mut packet = prototype.instantiate();
        if let Err(e) = packet.parse(&mut reader) {
            tracing::debug!(packet = %id, error = %e, "dropping malformed packet");
            return Dispatch::Malformed { id: Some(id) };
        }

        if !packet.handle(context) {
            return Dispatch::NoReply;
        }

        let mut writer = F::writer(&id);
        let encoded = packet
            .build(&mut writer)
            .and_then(|()| F::finish(writer));
        match encoded {
            Ok(response) => Dispatch::Reply(response),
            Err(e) => {
                tracing::warn!(packet = %id, error = %e, "failed to build response");
                Dispatch::NoReply
            }
        }
    }
}

impl<F: WireFormat, C: 'static> Default for PacketRegistry<F, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{XtFormat, XtReader, XtWriter};

    /// Counts how many times it was handled and echoes its field back.
    #[derive(Default)]
    struct Echo {
        text: String,
    }

    #[derive(Default)]
    struct Ctx {
        handled: usize,
        reply: bool,
    }

    impl Packet<XtFormat, Ctx> for Echo {
        fn id(&self) -> &'static str {
            "echo"
        }

        fn instantiate(&self) -> Box<dyn Packet<XtFormat, Ctx>> {
            Box::new(Echo::default())
        }

        fn parse(&mut self, reader: &mut XtReader) -> Result<(), ProtocolError> {
            // A reused instance would already hold text from a previous frame.
            assert!(self.text.is_empty(), "instance was reused");
            self.text = reader.read_string()?;
            Ok(())
        }

        fn handle(&mut self, context: &mut Ctx) -> bool {
            context.handled += 1;
            context.reply
        }

        fn build(&self, writer: &mut XtWriter) -> Result<(), ProtocolError> {
            writer.write_string(&self.text);
            Ok(())
        }
    }

    fn registry() -> PacketRegistry<XtFormat, Ctx> {
        PacketRegistry::new().with(Box::new(Echo::default()))
    }

    #[test]
    fn test_dispatch_reply_when_handler_asks_for_one() {
        let mut ctx = Ctx { reply: true, ..Ctx::default() };
        let out = registry().dispatch("%xt%o%echo%-1%hi%", &mut ctx);
        assert_eq!(out, Dispatch::Reply("%xt%echo%-1%hi%".into()));
        assert_eq!(ctx.handled, 1);
    }

    #[test]
    fn test_dispatch_no_reply_when_handler_declines() {
        let mut ctx = Ctx::default();
        let out = registry().dispatch("%xt%o%echo%-1%hi%", &mut ctx);
        assert_eq!(out, Dispatch::NoReply);
        assert_eq!(ctx.handled, 1);
    }

    #[test]
    fn test_dispatch_uses_fresh_instance_each_time() {
        let registry = registry();
        let mut ctx = Ctx { reply: true, ..Ctx::default() };
        registry.dispatch("%xt%o%echo%-1%one%", &mut ctx);
        let out = registry.dispatch("%xt%o%echo%-1%two%", &mut ctx);
        assert_eq!(out, Dispatch::Reply("%xt%echo%-1%two%".into()));
        assert_eq!(ctx.handled, 2);
    }

    #[test]
    fn test_dispatch_unknown_identifier_is_ignored() {
        let mut ctx = Ctx::default();
        let out = registry().dispatch("%xt%o%zzz.unknown%-1%", &mut ctx);
        assert_eq!(out, Dispatch::Unknown { id: "zzz.unknown".into() });
        assert_eq!(ctx.handled, 0);
    }

    #[test]
    fn test_dispatch_malformed_fields_skip_handler() {
        let mut ctx = Ctx::default();
        let out = registry().dispatch("%xt%o%echo%-1%", &mut ctx);
        assert_eq!(out, Dispatch::Malformed { id: Some("echo".into()) });
        assert_eq!(ctx.handled, 0);
    }

    #[test]
    fn test_dispatch_unframeable_input() {
        let mut ctx = Ctx::default();
        let out = registry().dispatch("garbage", &mut ctx);
        assert_eq!(out, Dispatch::Malformed { id: None });
    }

    #[test]
    fn test_register_counts_and_lookup() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("echo"));
        assert!(!registry.contains("other"));
        assert!(PacketRegistry::<XtFormat, Ctx>::default().is_empty());
    }
}
