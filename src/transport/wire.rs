//! Wire shapes of the queue service.
//!
//! Inbound batches use the queue's event layout (`Records`, camelCase record
//! fields, `{ stringValue, dataType }` message attributes) so a batch delivered
//! by the service deserializes directly into [`QueueBatch`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Data type tag for string-valued message attributes.
pub const STRING_DATA_TYPE: &str = "String";

/// System attribute carrying the FIFO message group of a delivered record.
pub const MESSAGE_GROUP_ID: &str = "MessageGroupId";

/// System attribute carrying the FIFO sequence number of a delivered record.
pub const SEQUENCE_NUMBER: &str = "SequenceNumber";

/// One inbound batch of records, in delivery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueBatch {
    #[serde(rename = "Records")]
    pub records: Vec<QueueRecord>,
}

impl QueueBatch {
    pub fn new(records: Vec<QueueRecord>) -> Self {
        Self { records }
    }

    /// Checks that `raw` has the shape of a batch before any field is read.
    pub fn from_value(raw: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(raw)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A single delivered message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    #[serde(default)]
    pub message_id: String,
    pub body: String,
    /// Attributes set by the queue service itself.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Attributes set by the producer.
    #[serde(default)]
    pub message_attributes: BTreeMap<String, MessageAttribute>,
}

impl QueueRecord {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// Adds a string message attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_attributes
            .insert(name.into(), MessageAttribute::string(value));
        self
    }

    /// String value of a producer attribute. `None` when the attribute or its value is missing.
    pub fn message_attribute(&self, name: &str) -> Option<&str> {
        self.message_attributes
            .get(name)
            .and_then(|a| a.string_value.as_deref())
    }

    pub fn system_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// A typed message attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAttribute {
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default = "default_data_type")]
    pub data_type: String,
}

impl MessageAttribute {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            data_type: STRING_DATA_TYPE.to_string(),
        }
    }
}

fn default_data_type() -> String {
    STRING_DATA_TYPE.to_string()
}

/// A fully addressed message ready for submission to the queue service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub queue_name: String,
    pub queue_url: String,
    pub body: String,
    pub attributes: BTreeMap<String, MessageAttribute>,
    /// FIFO message group; messages sharing it are delivered in send order.
    pub group_id: String,
}

impl OutboundMessage {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|a| a.string_value.as_deref())
    }
}

/// Acknowledgement returned by the queue service for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: String,
    pub sequence_number: u64,
}
