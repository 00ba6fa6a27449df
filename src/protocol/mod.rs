//! # Queue Communication Protocol
//!
//! [`QueueCommunicationProtocol`] implements [`CommunicationProtocol`] on top of
//! a FIFO queue service.
//!
//! ## Addressing
//!
//! A message for entity `orders:42` goes to the queue named by the
//! [`QueueNaming`] scheme (by default `orders`) with a message group derived
//! from `orders:42` by the [`OrderingKeyScheme`]. Since the group is a pure
//! function of the destination, all producers put commands for one entity in
//! the same group, and the queue delivers them in send order.
//!
//! Routing metadata travels in message attributes, not in the body, so a
//! consumer can route a record without parsing its payload.
//!
//! ## Error Policy
//!
//! | Problem                              | Outcome                          |
//! |--------------------------------------|----------------------------------|
//! | Receiver missing or unparseable      | Whole group dropped, no error    |
//! | Sender missing or unparseable        | Command kept, sender is `None`   |
//! | Type missing                         | Command kept, type is `""`       |
//! | Body not valid JSON                  | Whole batch fails                |
//! | Ordering key over 128 characters     | `send` fails before submitting   |
//! | Transport refuses a send             | `send` fails, no retry           |
//!
//! Addressing schemes that could not route a sent message back (a digest
//! group id read as the receiver, two routing attributes with one name) are
//! rejected when the protocol is built, see [`AddressingConfig::validate`].

pub mod config;
pub mod ordering;
pub mod receive;
pub mod send;

pub use config::*;
pub use ordering::{digest_key, MAX_GROUP_ID_LEN};

use crate::framework::{CommunicationProtocol, ProtocolError};
use crate::model::{Command, DispatchUnit, EntityRef};
use crate::transport::{self, QueueBatch, QueueTransport};
use async_trait::async_trait;
use std::sync::Arc;

/// [`CommunicationProtocol`] over a FIFO queue service.
///
/// Cheap to clone; clones share the configuration and the transport handle.
#[derive(Clone)]
pub struct QueueCommunicationProtocol {
    config: Arc<ProtocolConfig>,
    transport: Arc<dyn QueueTransport>,
}

impl QueueCommunicationProtocol {
    /// Builds a protocol that owns `transport`. Fails if `config` does not validate.
    pub fn new(config: ProtocolConfig, transport: impl QueueTransport + 'static) -> Result<Self, ConfigError> {
        Self::from_shared(config, Arc::new(transport))
    }

    /// Builds a protocol on an already shared transport handle.
    pub fn from_shared(config: ProtocolConfig, transport: Arc<dyn QueueTransport>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Builds a protocol on the process-wide transport, initializing it with `init` if needed.
    ///
    /// The configuration is checked first; a rejected configuration leaves the
    /// shared transport uninitialized.
    pub fn with_shared_transport<T, F>(config: ProtocolConfig, init: F) -> Result<Self, ConfigError>
    where
        T: QueueTransport + 'static,
        F: FnOnce() -> T,
    {
        config.validate()?;
        Self::from_shared(config, transport::shared_transport(init))
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    fn addressing(&self) -> &AddressingConfig {
        &self.config.addressing
    }
}

#[async_trait]
impl CommunicationProtocol for QueueCommunicationProtocol {
    type Batch = QueueBatch;

    fn receive(&self, batch: Option<&QueueBatch>) -> Result<Vec<DispatchUnit>, ProtocolError> {
        match batch {
            Some(batch) => self.receive_batch(batch),
            None => Ok(Vec::new()),
        }
    }

    async fn send(&self, to: &EntityRef, command: Command) -> Result<(), ProtocolError> {
        self.send_command(to, command).await.map(|_| ())
    }
}
