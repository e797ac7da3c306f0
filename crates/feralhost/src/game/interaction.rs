use feralhost_protocol::{Packet, ProtocolError, XtFormat, XtReader, XtWriter};

use super::GameContext;

/// `oac`: the client walked away from whatever it was interacting with.
///
/// The reply is an empty acknowledgement: `%xt%oac%-1%`.
#[derive(Debug, Default)]
pub struct InteractionCancel {
    target: String,
}

impl Packet<XtFormat, GameContext> for InteractionCancel {
    fn id(&self) -> &'static str {
        "oac"
    }

    fn instantiate(&self) -> Box<dyn Packet<XtFormat, GameContext>> {
        Box::new(Self::default())
    }

    fn parse(&mut self, reader: &mut XtReader) -> Result<(), ProtocolError> {
        self.target = reader.read_remaining();
        Ok(())
    }

    fn handle(&mut self, context: &mut GameContext) -> bool {
        tracing::debug!(
            account = %context.account(),
            target = %self.target,
            "interaction cancelled"
        );
        true
    }

    fn build(&self, _writer: &mut XtWriter) -> Result<(), ProtocolError> {
        Ok(())
    }
}
