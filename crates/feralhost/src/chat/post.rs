use feralhost_chat::{ChatMessage, PRIVATE_CONVERSATION, ROOM_CONVERSATION};
use feralhost_protocol::{ChatFormat, ChatReader, ChatWriter, ConversationId, Packet, ProtocolError};
use serde_json::Value;

use super::ChatContext;

/// `chat.postMessage`: posts a message to a room the client has joined.
///
/// Every member, the sender included, receives a `chat.postMessage`
/// event. Messages in private rooms are also appended to the
/// conversation history. There is no direct reply.
#[derive(Debug, Default)]
pub struct PostMessage {
    conversation: ConversationId,
    content: String,
}

impl PostMessage {
    const ID: &'static str = "chat.postMessage";

    fn event(&self, message: &ChatMessage, private: bool) -> Result<String, ProtocolError> {
        let conversation_type = if private {
            PRIVATE_CONVERSATION
        } else {
            ROOM_CONVERSATION
        };
        let mut writer = ChatWriter::new(Self::ID);
        writer
            .put("conversation_id", Value::String(self.conversation.0.clone()))
            .put("conversation_type", Value::String(conversation_type.to_string()))
            .put_serialized("message", &message.view())?;
        writer.encode()
    }
}

impl Packet<ChatFormat, ChatContext> for PostMessage {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn instantiate(&self) -> Box<dyn Packet<ChatFormat, ChatContext>> {
        Box::new(Self::default())
    }

    fn parse(&mut self, reader: &mut ChatReader) -> Result<(), ProtocolError> {
        self.conversation = ConversationId(reader.read_string("conversationId")?);
        self.content = reader.read_string("message")?;
        Ok(())
    }

    fn handle(&mut self, context: &mut ChatContext) -> bool {
        let state = context.state();
        let account = context.account();

        if !state.rooms.is_member(account, &self.conversation) {
            tracing::debug!(%account, room = %self.conversation, "post to a room not joined, ignoring");
            return false;
        }

        let message = ChatMessage::new(self.content.as_str(), account.clone());
        let private = state.rooms.is_private(&self.conversation);
        if private {
            if let Err(e) = state.dms.append_message(&self.conversation, message.clone()) {
                tracing::warn!(%account, error = %e, "failed to store direct message");
            }
        }

        match self.event(&message, private) {
            Ok(frame) => {
                let delivered = state.broadcast(&self.conversation, &frame);
                tracing::debug!(%account, room = %self.conversation, delivered, "message posted");
            }
            Err(e) => tracing::warn!(%account, error = %e, "failed to encode chat event"),
        }
        false
    }

    fn build(&self, _writer: &mut ChatWriter) -> Result<(), ProtocolError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use feralhost_chat::ChatState;
    use feralhost_protocol::{AccountId, Dispatch};
    use tokio::sync::mpsc;

    use super::*;
    use crate::chat::chat_packets;

    #[test]
    fn test_post_private_message_stores_and_broadcasts() {
        let state = Arc::new(ChatState::new());
        let alice = AccountId::from("alice");
        let bob = AccountId::from("bob");
        let room = ConversationId::from("dm-1");
        state.rooms.join(&alice, &room, true);
        state.rooms.join(&bob, &room, true);
        state.dms.open_dm(&room, &[alice.clone(), bob.clone()]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.connect(bob.clone(), tx).unwrap();

        let mut ctx = ChatContext::new(alice.clone(), Arc::clone(&state));
        let out = chat_packets().dispatch(
            r#"{"cmd":"chat.postMessage","conversationId":"dm-1","message":"hello"}"#,
            &mut ctx,
        );

        assert_eq!(out, Dispatch::NoReply);
        let history = state.dms.dm_history(&room).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[0].source, alice);

        let event: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(event["eventId"], "chat.postMessage");
        assert_eq!(event["conversation_id"], "dm-1");
        assert_eq!(event["conversation_type"], "private");
        assert_eq!(event["message"]["body"], "hello");
        assert_eq!(event["message"]["source"], "alice");
    }

    #[test]
    fn test_post_public_message_is_not_stored() {
        let state = Arc::new(ChatState::new());
        let alice = AccountId::from("alice");
        let room = ConversationId::from("lobby");
        state.rooms.join(&alice, &room, false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.connect(alice.clone(), tx).unwrap();

        let mut ctx = ChatContext::new(alice, Arc::clone(&state));
        chat_packets().dispatch(
            r#"{"cmd":"chat.postMessage","conversationId":"lobby","message":"hi all"}"#,
            &mut ctx,
        );

        assert!(!state.dms.dm_exists(&room));
        let event: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(event["conversation_type"], "room");
    }

    #[test]
    fn test_post_from_non_member_is_dropped() {
        let state = Arc::new(ChatState::new());
        let room = ConversationId::from("dm-1");
        state.rooms.join(&AccountId::from("alice"), &room, true);
        state.dms.open_dm(&room, &[AccountId::from("alice")]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        state.connect(AccountId::from("alice"), tx).unwrap();

        let mut ctx = ChatContext::new(AccountId::from("mallory"), Arc::clone(&state));
        chat_packets().dispatch(
            r#"{"cmd":"chat.postMessage","conversationId":"dm-1","message":"spam"}"#,
            &mut ctx,
        );

        assert!(state.dms.dm_history(&room).unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }
}
