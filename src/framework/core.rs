//! # Core Protocol Abstraction
//!
//! This module defines the contract between an entity runtime and a message
//! transport.
//!
//! ## Key Types
//!
//! - [`CommunicationProtocol`]: The trait every transport adapter implements.
//! - [`ProtocolError`]: Failures surfaced to the runtime.

use crate::model::{Command, DispatchUnit, EntityRef};
use crate::transport::TransportError;
use async_trait::async_trait;

/// Errors surfaced by a [`CommunicationProtocol`].
///
/// Attribute-level problems (a bad receiver or sender reference, a missing
/// type) never show up here; they are handled inside `receive`. Only payload
/// and transport failures reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The raw input did not have the shape of a batch.
    #[error("Malformed batch: {0}")]
    MalformedBatch(#[source] serde_json::Error),

    /// A record body was not valid JSON. The whole batch is rejected.
    #[error("Invalid body in record {index} for {receiver}: {source}")]
    InvalidBody {
        receiver: EntityRef,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The ordering key for `receiver` exceeds the queue's group id limit.
    #[error("Ordering key for {receiver} is {len} characters, limit is {limit}")]
    OrderingKeyTooLong {
        receiver: EntityRef,
        len: usize,
        limit: usize,
    },

    /// A command body could not be serialized.
    #[error("Body serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Contract between an entity runtime and a transport.
///
/// # Architecture Note
/// The runtime never sees queue records or wire attributes. It calls
/// [`receive`](Self::receive) with whatever the transport delivered and gets
/// back [`DispatchUnit`]s, then dispatches each unit's commands, in order, to
/// its receiver. When an entity emits a command the runtime calls
/// [`send`](Self::send) and decides for itself whether to await the result.
///
/// # Ordering
/// `receive` keeps per-receiver order exactly as delivered and never merges
/// receivers. The order of units relative to each other carries no meaning.
#[async_trait]
pub trait CommunicationProtocol: Send + Sync {
    /// The inbound batch type delivered by the transport.
    type Batch: Send + Sync;

    /// Translates one delivered batch into dispatch units.
    ///
    /// An absent batch yields an empty list.
    fn receive(&self, batch: Option<&Self::Batch>) -> Result<Vec<DispatchUnit>, ProtocolError>;

    /// Addresses `command` to `to` and submits it. Single attempt, no retry.
    ///
    /// Dropping the returned future stops waiting but does not guarantee the
    /// message was not submitted.
    async fn send(&self, to: &EntityRef, command: Command) -> Result<(), ProtocolError>;
}
