//! Protocol configuration.
//!
//! Everything that decides *where* a message goes and *how* it is tagged lives
//! in [`AddressingConfig`]. The defaults are the per-entity-type addressing
//! scheme: one queue per entity type, SHA-256 ordering keys and the
//! `Receiver`/`Sender`/`Type` attributes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Environment variable holding the queue service region.
pub const REGION_ENV: &str = "QUEUE_REGION";

/// Environment variable holding the account that owns the queues.
pub const ACCOUNT_ID_ENV: &str = "QUEUE_ACCOUNT_ID";

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_ACCOUNT_ID: &str = "000000000000";

/// Names of the message attributes that carry routing metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    pub receiver: String,
    pub sender: String,
    pub command_type: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            receiver: "Receiver".to_string(),
            sender: "Sender".to_string(),
            command_type: "Type".to_string(),
        }
    }
}

/// How the destination queue is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum QueueNaming {
    /// The queue name is the destination's entity type.
    #[default]
    PerEntityType,
    /// Every message goes to one queue.
    Fixed(String),
}

/// How the FIFO message group is derived from the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingKeyScheme {
    /// Hex SHA-256 of the destination's canonical string.
    #[default]
    Sha256,
    /// The destination's canonical string, verbatim.
    CanonicalRef,
}

/// Where the receive path reads the receiver of a record from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSource {
    /// The receiver message attribute.
    #[default]
    ReceiverAttribute,
    /// The queue's own `MessageGroupId` system attribute. Requires
    /// [`OrderingKeyScheme::CanonicalRef`], where the group id is a parseable reference.
    MessageGroupId,
}

/// Rejected configurations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Receivers are read from the group id, but the group id is a digest.
    #[error("Group source message_group_id requires the canonical_ref ordering key, got {0:?}")]
    UnroutableGroupId(OrderingKeyScheme),

    /// Two routing attributes share one name.
    #[error("Attribute name {0:?} is used for more than one routing attribute")]
    DuplicateAttribute(String),

    #[error("Attribute names must not be empty")]
    EmptyAttribute,

    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AttributeNames {
    /// Checks that the three names are non-empty and pairwise distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for name in [&self.receiver, &self.sender, &self.command_type] {
            if name.is_empty() {
                return Err(ConfigError::EmptyAttribute);
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateAttribute(name.clone()));
            }
        }
        Ok(())
    }
}

/// Addressing scheme shared by the send and receive paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressingConfig {
    pub attributes: AttributeNames,
    pub queue_naming: QueueNaming,
    pub ordering_key: OrderingKeyScheme,
    pub group_source: GroupSource,
}

impl AddressingConfig {
    /// Rejects schemes under which sent messages could not be routed back.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.attributes.validate()?;
        if self.group_source == GroupSource::MessageGroupId && self.ordering_key != OrderingKeyScheme::CanonicalRef {
            return Err(ConfigError::UnroutableGroupId(self.ordering_key));
        }
        Ok(())
    }
}

/// Full protocol configuration. Immutable once the protocol is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub region: String,
    pub account_id: String,
    pub addressing: AddressingConfig,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGION, DEFAULT_ACCOUNT_ID)
    }
}

impl ProtocolConfig {
    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account_id: account_id.into(),
            addressing: AddressingConfig::default(),
        }
    }

    /// Replaces the addressing scheme.
    pub fn with_addressing(mut self, addressing: AddressingConfig) -> Self {
        self.addressing = addressing;
        self
    }

    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.addressing.validate()
    }

    /// Reads region and account from [`REGION_ENV`] and [`ACCOUNT_ID_ENV`].
    pub fn from_env() -> Self {
        let region = std::env::var(REGION_ENV).unwrap_or_else(|_| DEFAULT_REGION.to_string());
        let account_id = std::env::var(ACCOUNT_ID_ENV).unwrap_or_else(|_| DEFAULT_ACCOUNT_ID.to_string());
        Self::new(region, account_id)
    }

    /// URL of `queue_name` in this region and account.
    pub fn queue_url(&self, queue_name: &str) -> String {
        format!(
            "https://sqs.{}.amazonaws.com/{}/{}",
            self.region, self.account_id, queue_name
        )
    }
}
