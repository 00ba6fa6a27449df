#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Entity Queue Protocol
//!
//! > **Entity addressing over a FIFO message queue.**
//!
//! An entity runtime addresses commands to logical entities (`orders:42`,
//! `users:bob`). This crate is the layer between that runtime and a FIFO queue
//! service: it decides which queue a command goes to, which message group keeps
//! it in order, and how a delivered batch turns back into per-entity command lists.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Deterministic Addressing
//! The destination queue and the message group are pure functions of the
//! destination [`EntityRef`](model::EntityRef). Every producer, in every
//! process, puts commands for one entity into one group, so the queue
//! delivers them in send order. Unrelated entities land in different groups
//! and make progress independently.
//!
//! ### Never Reorder, Never Merge
//! The queue only orders messages *within* a group. The receive path groups a
//! batch by receiver without disturbing relative order and never combines
//! two receivers' commands.
//!
//! ### Tolerate Addresses, Not Payloads
//! A record with an unroutable receiver takes only its own group down, silently.
//! A record whose body is not valid JSON fails the whole batch, so the queue
//! can redeliver it instead of the runtime seeing a partial batch.
//!
//! ## 🚀 Core Concepts
//!
//! ### The Contract: [`CommunicationProtocol`](framework::CommunicationProtocol)
//! `receive(batch) -> Vec<DispatchUnit>` and `send(to, command)`. The runtime
//! sees nothing else.
//!
//! ### The Implementation: [`QueueCommunicationProtocol`](protocol::QueueCommunicationProtocol)
//! Parameterized by an [`AddressingConfig`](protocol::AddressingConfig):
//! attribute names, queue naming, ordering-key scheme and where the receiver
//! is read from.
//!
//! ### Mocking: Testing without a Queue
//! [`MockTransport`](framework::mock::MockTransport) records every message and
//! replays scripted acknowledgements or failures.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! - **Key items**: [`EntityRef`](model::EntityRef), [`Command`](model::Command), [`DispatchUnit`](model::DispatchUnit).
//!
//! ### 2. The Contract ([`framework`])
//! - **Key items**: [`CommunicationProtocol`](framework::CommunicationProtocol), [`group_by`](framework::group_by), [`ProtocolError`](framework::ProtocolError).
//!
//! ### 3. The Adapter ([`protocol`])
//! - **Key items**: [`QueueCommunicationProtocol`](protocol::QueueCommunicationProtocol), [`ProtocolConfig`](protocol::ProtocolConfig).
//!
//! ### 4. The Queue ([`transport`])
//! - **Role**: The queue service as a collaborator, plus an in-process implementation.
//! - **Key items**: [`QueueTransport`](transport::QueueTransport), [`InMemoryQueue`](transport::InMemoryQueue), [`shared_transport`](transport::shared_transport).
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`QueueSystem`](lifecycle::QueueSystem), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod protocol;
pub mod transport;
