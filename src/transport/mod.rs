//! The queue service as seen by the protocol.
//!
//! # Main Components
//!
//! - [`QueueTransport`] - The single operation the protocol needs from the service
//! - [`wire`] - Inbound batch and outbound message shapes
//! - [`memory`] - An in-process FIFO queue service, used by tests and the demo
//! - [`shared_transport`] - Process-wide transport handle

pub mod memory;
pub mod shared;
pub mod wire;

pub use memory::{InMemoryQueue, QueueActor};
pub use shared::*;
pub use wire::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a queue transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The queue service is no longer accepting requests.
    #[error("Queue service closed")]
    Closed,

    #[error("Queue service dropped response channel")]
    Dropped,

    /// The destination queue does not exist.
    #[error("Queue not found: {0}")]
    QueueNotFound(String),

    /// The service refused the message.
    #[error("Message rejected: {0}")]
    Rejected(String),
}

/// Submission side of a FIFO queue service.
///
/// Implementations must be safe to share across concurrent callers; the
/// protocol holds one behind an `Arc` and never locks around it.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Submits one message. Resolves once the service has accepted or refused it.
    async fn send_message(&self, message: OutboundMessage) -> Result<SendReceipt, TransportError>;
}
