//! Inbound translation: queue records to dispatch units.

use super::config::GroupSource;
use super::QueueCommunicationProtocol;
use crate::framework::{group_by, ProtocolError};
use crate::model::{Command, DispatchUnit, EntityRef};
use crate::transport::{QueueBatch, QueueRecord, MESSAGE_GROUP_ID};
use serde_json::Value;
use tracing::debug;

impl QueueCommunicationProtocol {
    /// Validates untyped input into a [`QueueBatch`] and translates it.
    ///
    /// JSON `null` is an absent batch and yields an empty list. Anything else
    /// that is not shaped like a batch fails with [`ProtocolError::MalformedBatch`].
    pub fn receive_raw(&self, raw: &Value) -> Result<Vec<DispatchUnit>, ProtocolError> {
        if raw.is_null() {
            return Ok(Vec::new());
        }
        let batch = QueueBatch::from_value(raw).map_err(ProtocolError::MalformedBatch)?;
        self.receive_batch(&batch)
    }

    /// Translates a batch, keeping each receiver's commands in delivery order.
    pub fn receive_batch(&self, batch: &QueueBatch) -> Result<Vec<DispatchUnit>, ProtocolError> {
        let groups = group_by(batch.records.iter().enumerate(), |(_, record)| {
            self.receiver_key(record).to_string()
        });

        let mut units = Vec::with_capacity(groups.len());
        for group in groups {
            let receiver = match EntityRef::parse(&group.key) {
                Ok(receiver) => receiver,
                Err(error) => {
                    debug!(key = %group.key, records = group.items.len(), %error, "Dropping unroutable group");
                    continue;
                }
            };

            let commands = group
                .items
                .into_iter()
                .map(|(index, record)| self.to_command(&receiver, index, record))
                .collect::<Result<Vec<_>, _>>()?;

            units.push(DispatchUnit::new(receiver, commands));
        }

        debug!(records = batch.len(), units = units.len(), "Batch translated");
        Ok(units)
    }

    fn receiver_key<'a>(&self, record: &'a QueueRecord) -> &'a str {
        let key = match self.addressing().group_source {
            GroupSource::ReceiverAttribute => {
                record.message_attribute(&self.addressing().attributes.receiver)
            }
            GroupSource::MessageGroupId => record.system_attribute(MESSAGE_GROUP_ID),
        };
        key.unwrap_or_default()
    }

    fn to_command(
        &self,
        receiver: &EntityRef,
        index: usize,
        record: &QueueRecord,
    ) -> Result<Command, ProtocolError> {
        let names = &self.addressing().attributes;
        let body: Value = serde_json::from_str(&record.body).map_err(|source| ProtocolError::InvalidBody {
            receiver: receiver.clone(),
            index,
            source,
        })?;
        let command_type = record.message_attribute(&names.command_type).unwrap_or_default();
        let sender = record
            .message_attribute(&names.sender)
            .and_then(|s| EntityRef::parse(s).ok());

        Ok(Command::new(command_type, body).with_sender(sender))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockTransport;
    use crate::framework::CommunicationProtocol;
    use crate::protocol::{AddressingConfig, OrderingKeyScheme, ProtocolConfig};
    use serde_json::json;

    fn protocol() -> QueueCommunicationProtocol {
        QueueCommunicationProtocol::new(ProtocolConfig::default(), MockTransport::new()).unwrap()
    }

    fn record(receiver: &str, body: &str) -> QueueRecord {
        QueueRecord::new(body).with_attribute("Receiver", receiver)
    }

    fn bodies(unit: &DispatchUnit) -> Vec<Value> {
        unit.commands.iter().map(|c| c.body().clone()).collect()
    }

    #[test]
    fn test_absent_batch_is_empty() {
        let protocol = protocol();
        assert!(protocol.receive(None).unwrap().is_empty());
        assert!(protocol.receive_raw(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_groups_by_receiver_in_order() {
        let batch = QueueBatch::new(vec![
            record("orders:x", r#"{"n":"A"}"#),
            record("orders:y", r#"{"n":"B"}"#),
            record("orders:x", r#"{"n":"C"}"#),
        ]);

        let units = protocol().receive(Some(&batch)).unwrap();
        assert_eq!(units.len(), 2);

        let x = units.iter().find(|u| u.receiver.id() == "x").unwrap();
        let y = units.iter().find(|u| u.receiver.id() == "y").unwrap();
        assert_eq!(bodies(x), vec![json!({"n":"A"}), json!({"n":"C"})]);
        assert_eq!(bodies(y), vec![json!({"n":"B"})]);
    }

    #[test]
    fn test_unparseable_receiver_drops_only_its_group() {
        let batch = QueueBatch::new(vec![
            record("not-a-valid-ref", "1"),
            record("orders:ok", "2"),
            QueueRecord::new("3"),
            record("not-a-valid-ref", "4"),
        ]);

        let units = protocol().receive(Some(&batch)).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].receiver, EntityRef::new("orders", "ok").unwrap());
        assert_eq!(bodies(&units[0]), vec![json!(2)]);
    }

    #[test]
    fn test_invalid_body_fails_whole_batch() {
        let batch = QueueBatch::new(vec![
            record("orders:a", "{}"),
            record("orders:b", "{not json"),
        ]);

        let err = protocol().receive(Some(&batch)).unwrap_err();
        match err {
            ProtocolError::InvalidBody { receiver, index, .. } => {
                assert_eq!(receiver.to_string(), "orders:b");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_body_in_dropped_group_is_ignored() {
        let batch = QueueBatch::new(vec![record("garbage", "{not json"), record("orders:a", "1")]);
        let units = protocol().receive(Some(&batch)).unwrap();
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn test_missing_type_and_sender_are_defaulted() {
        let batch = QueueBatch::new(vec![
            record("orders:a", "1"),
            record("orders:a", "2")
                .with_attribute("Type", "Ship")
                .with_attribute("Sender", "users:bob"),
            record("orders:a", "3").with_attribute("Sender", "bogus"),
        ]);

        let units = protocol().receive(Some(&batch)).unwrap();
        let commands = &units[0].commands;
        assert_eq!(commands.len(), 3);

        assert_eq!(commands[0].command_type(), "");
        assert_eq!(commands[0].sender(), None);
        assert_eq!(commands[1].command_type(), "Ship");
        assert_eq!(commands[1].sender(), Some(&EntityRef::new("users", "bob").unwrap()));
        assert_eq!(commands[2].sender(), None);
    }

    #[test]
    fn test_receive_raw_validates_shape() {
        let protocol = protocol();
        let raw = json!({
            "Records": [{
                "body": "{\"qty\":3}",
                "messageAttributes": {
                    "Receiver": { "stringValue": "carts:9", "dataType": "String" },
                    "Type": { "stringValue": "AddItem", "dataType": "String" }
                }
            }]
        });
        let units = protocol.receive_raw(&raw).unwrap();
        assert_eq!(units[0].receiver.to_string(), "carts:9");
        assert_eq!(units[0].commands[0].command_type(), "AddItem");

        for malformed in [json!({}), json!([1, 2]), json!({ "Records": "nope" }), json!(42)] {
            assert!(matches!(
                protocol.receive_raw(&malformed),
                Err(ProtocolError::MalformedBatch(_))
            ));
        }
    }

    #[test]
    fn test_group_by_message_group_id() {
        let addressing = AddressingConfig {
            ordering_key: OrderingKeyScheme::CanonicalRef,
            group_source: GroupSource::MessageGroupId,
            ..AddressingConfig::default()
        };
        let protocol = QueueCommunicationProtocol::new(
            ProtocolConfig::default().with_addressing(addressing),
            MockTransport::new(),
        )
        .unwrap();

        let mut a = QueueRecord::new("1");
        a.attributes.insert(MESSAGE_GROUP_ID.into(), "users:1".into());
        let mut b = QueueRecord::new("2").with_attribute("Receiver", "users:2");
        b.attributes.insert(MESSAGE_GROUP_ID.into(), "users:1".into());

        let units = protocol.receive(Some(&QueueBatch::new(vec![a, b]))).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].receiver.to_string(), "users:1");
        assert_eq!(units[0].commands.len(), 2);
    }
}
