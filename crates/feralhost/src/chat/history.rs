use feralhost_chat::HistoryEntry;
use feralhost_protocol::{ChatFormat, ChatReader, ChatWriter, ConversationId, Packet, ProtocolError};
use serde_json::Value;

use super::ChatContext;

/// `conversations.history`: the stored messages of a direct-message room.
///
/// Always answers with `success: true`. Requests for rooms the client
/// isn't in, public rooms and unknown conversations get an empty list.
#[derive(Debug, Default)]
pub struct HistoryRequest {
    conversation: ConversationId,
    messages: Vec<HistoryEntry>,
}

impl Packet<ChatFormat, ChatContext> for HistoryRequest {
    fn id(&self) -> &'static str {
        "conversations.history"
    }

    fn instantiate(&self) -> Box<dyn Packet<ChatFormat, ChatContext>> {
        Box::new(Self::default())
    }

    fn parse(&mut self, reader: &mut ChatReader) -> Result<(), ProtocolError> {
        self.conversation = ConversationId(reader.read_string("conversationId")?);
        Ok(())
    }

    fn handle(&mut self, context: &mut ChatContext) -> bool {
        self.messages = context
            .state()
            .history_for(context.account(), &self.conversation);
        true
    }

    fn build(&self, writer: &mut ChatWriter) -> Result<(), ProtocolError> {
        writer.put_serialized("messages", &self.messages)?;
        writer.put("success", Value::Bool(true));
        Ok(())
    }
}
