//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! Log lines use the compact format and hide the module prefix (`with_target(false)`);
//! the structured fields (`receiver`, `queue`, `group_id`) carry the context instead.
//! Verbosity is controlled by the `RUST_LOG` environment variable.
//!
//! ## What Gets Traced
//!
//! - **Queue Service Lifecycle**: Startup and shutdown with queue counts
//! - **Sends**: A `send_command` span per outbound command, tagged with the receiver
//! - **Receives**: Batch sizes and every group dropped for an unroutable receiver
//! - **Errors**: Transport failures at `warn`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Queue names, group ids and dropped groups
//! RUST_LOG=debug cargo run
//!
//! # Filter to the protocol module
//! RUST_LOG=entity_queue_protocol::protocol=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a send and the matching poll look like:
//!
//! ```text
//! DEBUG send_command: Submitting receiver=orders:42 queue="orders" group_id="3f1c..."
//! DEBUG Accepted queue="orders" message_id="msg-1" depth=1
//! DEBUG send_command: Accepted receiver=orders:42 message_id="msg-1"
//! DEBUG Delivered queue="orders" delivered=1 remaining=0
//! DEBUG Batch translated records=1 units=1
//! ```

/// Initializes the tracing subscriber for the whole process.
///
/// Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Module paths add noise; the fields name the queue and receiver
        .compact()
        .init();
}
