//! Outbound translation: commands to addressed queue messages.

use super::ordering::MAX_GROUP_ID_LEN;
use super::QueueCommunicationProtocol;
use crate::framework::ProtocolError;
use crate::model::{Command, EntityRef};
use crate::transport::{MessageAttribute, OutboundMessage, SendReceipt};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

impl QueueCommunicationProtocol {
    /// Builds the queue message for `command` addressed to `to`. Performs no I/O.
    ///
    /// Fails with [`ProtocolError::OrderingKeyTooLong`] when the group id would
    /// be refused by the queue service.
    pub fn build_message(&self, to: &EntityRef, command: Command) -> Result<OutboundMessage, ProtocolError> {
        let addressing = self.addressing();
        let names = &addressing.attributes;
        let (command_type, body, sender) = command.into_parts();

        let queue_name = addressing.queue_naming.queue_name(to);
        let queue_url = self.config.queue_url(&queue_name);
        let group_id = addressing.ordering_key.ordering_key(to);
        let len = group_id.chars().count();
        if len > MAX_GROUP_ID_LEN {
            return Err(ProtocolError::OrderingKeyTooLong {
                receiver: to.clone(),
                len,
                limit: MAX_GROUP_ID_LEN,
            });
        }
        let body = serde_json::to_string(&body).map_err(ProtocolError::Serialization)?;

        let sender = sender.map(|s| s.to_string()).unwrap_or_default();
        let attributes = BTreeMap::from([
            (names.receiver.clone(), MessageAttribute::string(to.to_string())),
            (names.sender.clone(), MessageAttribute::string(sender)),
            (names.command_type.clone(), MessageAttribute::string(command_type)),
        ]);

        Ok(OutboundMessage {
            queue_name,
            queue_url,
            body,
            attributes,
            group_id,
        })
    }

    /// Builds and submits one message, returning the transport's receipt.
    #[instrument(skip(self, to, command), fields(receiver = %to))]
    pub async fn send_command(&self, to: &EntityRef, command: Command) -> Result<SendReceipt, ProtocolError> {
        let message = self.build_message(to, command)?;
        debug!(queue = %message.queue_name, group_id = %message.group_id, "Submitting");

        match self.transport.send_message(message).await {
            Ok(receipt) => {
                debug!(message_id = %receipt.message_id, "Accepted");
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "Send failed");
                Err(e.into())
            }
        }
    }
}
