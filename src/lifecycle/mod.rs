//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping a complete protocol stack.
//!
//! **Key Responsibilities:**
//! 1. **Service Creation** - Spawn the in-memory queue service
//! 2. **Wiring** - Build a [`QueueCommunicationProtocol`](crate::protocol::QueueCommunicationProtocol) on it
//! 3. **Graceful Shutdown** - Close every handle and wait for the service task
//! 4. **Observability Setup** - Initialize tracing and logging infrastructure
//!
//! The [`QueueSystem`] is what the demo binary and the integration tests run against.

pub mod queue_system;
pub mod tracing;

pub use queue_system::*;
pub use self::tracing::*;
