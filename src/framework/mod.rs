//! Transport-independent building blocks.
//!
//! # Main Components
//!
//! - [`CommunicationProtocol`] - The runtime/transport contract
//! - [`ProtocolError`] - Errors surfaced to the runtime
//! - [`group_by`] - Order-preserving grouping used by the receive path
//!
//! # Testing
//!
//! See [`mock`] module for a transport that records messages and replays scripted responses.

pub mod core;
pub mod grouping;
pub mod mock;

// Re-export core types for convenience
pub use self::core::*;
pub use self::grouping::*;
