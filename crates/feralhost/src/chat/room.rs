use feralhost_chat::PRIVATE_CONVERSATION;
use feralhost_protocol::{ChatFormat, ChatReader, ChatWriter, ConversationId, Packet, ProtocolError};
use serde_json::Value;

use super::ChatContext;

/// `chat.joinRoom`: adds the client to a room.
///
/// A `roomType` of `"private"` makes it a direct-message room and opens
/// its conversation, so history can be stored and requested.
#[derive(Debug, Default)]
pub struct JoinRoom {
    room: ConversationId,
    private: bool,
}

impl Packet<ChatFormat, ChatContext> for JoinRoom {
    fn id(&self) -> &'static str {
        "chat.joinRoom"
    }

    fn instantiate(&self) -> Box<dyn Packet<ChatFormat, ChatContext>> {
        Box::new(Self::default())
    }

    fn parse(&mut self, reader: &mut ChatReader) -> Result<(), ProtocolError> {
        self.room = ConversationId(reader.read_string("roomId")?);
        self.private = reader.read_optional_string("roomType").as_deref() == Some(PRIVATE_CONVERSATION);
        Ok(())
    }

    fn handle(&mut self, context: &mut ChatContext) -> bool {
        let state = context.state();
        let account = context.account();

        let created = state.rooms.join(account, &self.room, self.private);
        if state.rooms.is_private(&self.room) {
            state.dms.open_dm(&self.room, std::slice::from_ref(account));
        }
        tracing::debug!(%account, room = %self.room, created, "joined chat room");
        true
    }

    fn build(&self, writer: &mut ChatWriter) -> Result<(), ProtocolError> {
        writer.put("success", Value::Bool(true));
        writer.put("roomId", Value::String(self.room.0.clone()));
        Ok(())
    }
}

/// `chat.leaveRoom`: removes the client from a room. No reply.
#[derive(Debug, Default)]
pub struct LeaveRoom {
    room: ConversationId,
}

impl Packet<ChatFormat, ChatContext> for LeaveRoom {
    fn id(&self) -> &'static str {
        "chat.leaveRoom"
    }

    fn instantiate(&self) -> Box<dyn Packet<ChatFormat, ChatContext>> {
        Box::new(Self::default())
    }

    fn parse(&mut self, reader: &mut ChatReader) -> Result<(), ProtocolError> {
        self.room = ConversationId(reader.read_string("roomId")?);
        Ok(())
    }

    fn handle(&mut self, context: &mut ChatContext) -> bool {
        if let Err(e) = context.state().rooms.leave(context.account(), &self.room) {
            tracing::debug!(account = %context.account(), error = %e, "leave room failed");
        }
        false
    }

    fn build(&self, _writer: &mut ChatWriter) -> Result<(), ProtocolError> {
        Ok(())
    }
}
