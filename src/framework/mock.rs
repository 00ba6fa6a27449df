//! # Mock Transport
//!
//! Utilities for testing protocol code without a queue service.
//!
//! Use [`MockTransport::expect_send`] to script the responses the transport
//! should give, in order. Every message submitted is recorded and can be
//! inspected with [`MockTransport::sent_messages`].

use crate::transport::{OutboundMessage, QueueTransport, SendReceipt, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected submission and the response to give it.
struct Expectation {
    queue_name: Option<String>,
    response: Result<SendReceipt, TransportError>,
}

/// A transport with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mock = MockTransport::new();
/// mock.expect_send().to_queue("orders").return_ok();
/// mock.expect_send().return_err(TransportError::Rejected("throttled".into()));
///
/// let protocol = QueueCommunicationProtocol::new(config, mock.clone())?;
/// // Use protocol in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl MockTransport {
    /// Creates a new mock transport with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `send_message` call.
    pub fn expect_send(&self) -> SendExpectationBuilder {
        SendExpectationBuilder {
            queue_name: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Every message submitted so far, in submission order.
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl QueueTransport for MockTransport {
    async fn send_message(&self, message: OutboundMessage) -> Result<SendReceipt, TransportError> {
        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!("Unexpected send to queue {}", message.queue_name);
        };

        if let Some(expected) = &expectation.queue_name {
            assert_eq!(expected, &message.queue_name, "Send went to the wrong queue");
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(message);
        expectation.response.map(|mut receipt| {
            receipt.sequence_number = sent.len() as u64;
            receipt
        })
    }
}

/// Builder for `send_message` expectations.
pub struct SendExpectationBuilder {
    queue_name: Option<String>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl SendExpectationBuilder {
    /// Requires the message to target `queue_name`.
    pub fn to_queue(mut self, queue_name: impl Into<String>) -> Self {
        self.queue_name = Some(queue_name.into());
        self
    }

    /// Sets the expectation to acknowledge the message.
    pub fn return_ok(self) {
        let mut exps = self.expectations.lock().unwrap();
        let message_id = format!("mock-{}", exps.len() + 1);
        exps.push_back(Expectation {
            queue_name: self.queue_name,
            response: Ok(SendReceipt { message_id, sequence_number: 0 }),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: TransportError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            queue_name: self.queue_name,
            response: Err(error),
        });
    }
}
