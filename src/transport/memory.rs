//! # In-Memory FIFO Queue Service
//!
//! A queue service that lives inside the process. It is an actor: one Tokio task
//! owns every queue, and [`InMemoryQueue`] handles talk to it over a channel.
//!
//! ## Ordering
//!
//! Each queue is a single FIFO, so messages of one message group are always
//! delivered in the order they were accepted. Every accepted message gets a
//! monotonically increasing sequence number, recorded as the `SequenceNumber`
//! system attribute next to its `MessageGroupId`.
//!
//! ## Queue Creation
//!
//! By default queues are created on first send. [`QueueActor::with_queues`]
//! builds a service that only knows the listed queues and refuses the rest
//! with [`TransportError::QueueNotFound`].

use super::wire::{OutboundMessage, QueueBatch, QueueRecord, SendReceipt, MESSAGE_GROUP_ID, SEQUENCE_NUMBER};
use super::{QueueTransport, TransportError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Type alias for the one-shot response channel used by the queue actor.
pub type Response<T> = oneshot::Sender<Result<T, TransportError>>;

/// Requests understood by the [`QueueActor`].
#[derive(Debug)]
pub enum QueueRequest {
    Send {
        message: OutboundMessage,
        respond_to: Response<SendReceipt>,
    },
    Receive {
        queue_name: String,
        max_messages: usize,
        respond_to: Response<QueueBatch>,
    },
    Depth {
        queue_name: String,
        respond_to: Response<usize>,
    },
}

/// The task half of the in-memory queue service. Owns all queue state.
pub struct QueueActor {
    receiver: mpsc::Receiver<QueueRequest>,
    queues: HashMap<String, VecDeque<QueueRecord>>,
    auto_create: bool,
    next_sequence: u64,
}

impl QueueActor {
    /// Creates a service that creates queues on first use.
    pub fn new(buffer_size: usize) -> (Self, InMemoryQueue) {
        Self::build(buffer_size, HashMap::new(), true)
    }

    /// Creates a service that knows only `queue_names`.
    pub fn with_queues<I, S>(buffer_size: usize, queue_names: I) -> (Self, InMemoryQueue)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queues = queue_names
            .into_iter()
            .map(|name| (name.into(), VecDeque::new()))
            .collect();
        Self::build(buffer_size, queues, false)
    }

    fn build(
        buffer_size: usize,
        queues: HashMap<String, VecDeque<QueueRecord>>,
        auto_create: bool,
    ) -> (Self, InMemoryQueue) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            queues,
            auto_create,
            next_sequence: 1,
        };
        (actor, InMemoryQueue::new(sender))
    }

    /// Runs the service loop until every [`InMemoryQueue`] handle is dropped.
    pub async fn run(mut self) {
        info!(queues = self.queues.len(), auto_create = self.auto_create, "Queue service started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                QueueRequest::Send { message, respond_to } => {
                    let result = self.accept(message);
                    let _ = respond_to.send(result);
                }
                QueueRequest::Receive { queue_name, max_messages, respond_to } => {
                    let result = self.take(&queue_name, max_messages);
                    let _ = respond_to.send(result);
                }
                QueueRequest::Depth { queue_name, respond_to } => {
                    let result = self
                        .queues
                        .get(&queue_name)
                        .map(VecDeque::len)
                        .ok_or(TransportError::QueueNotFound(queue_name));
                    let _ = respond_to.send(result);
                }
            }
        }

        let pending: usize = self.queues.values().map(VecDeque::len).sum();
        info!(queues = self.queues.len(), pending, "Queue service shutdown");
    }

    fn accept(&mut self, message: OutboundMessage) -> Result<SendReceipt, TransportError> {
        if !self.auto_create && !self.queues.contains_key(&message.queue_name) {
            warn!(queue = %message.queue_name, "Queue not found");
            return Err(TransportError::QueueNotFound(message.queue_name));
        }

        let sequence_number = self.next_sequence;
        self.next_sequence += 1;
        let message_id = format!("msg-{sequence_number}");
        let queue = self.queues.entry(message.queue_name.clone()).or_default();

        let mut record = QueueRecord::new(message.body);
        record.message_id = message_id.clone();
        record.message_attributes = message.attributes;
        record
            .attributes
            .insert(MESSAGE_GROUP_ID.to_string(), message.group_id);
        record
            .attributes
            .insert(SEQUENCE_NUMBER.to_string(), sequence_number.to_string());
        queue.push_back(record);

        debug!(queue = %message.queue_name, %message_id, depth = queue.len(), "Accepted");
        Ok(SendReceipt { message_id, sequence_number })
    }

    fn take(&mut self, queue_name: &str, max_messages: usize) -> Result<QueueBatch, TransportError> {
        let queue = self
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| TransportError::QueueNotFound(queue_name.to_string()))?;
        let count = max_messages.min(queue.len());
        let records: Vec<QueueRecord> = queue.drain(..count).collect();
        debug!(queue = %queue_name, delivered = records.len(), remaining = queue.len(), "Delivered");
        Ok(QueueBatch::new(records))
    }
}

/// Cloneable handle to a running [`QueueActor`].
#[derive(Clone)]
pub struct InMemoryQueue {
    sender: mpsc::Sender<QueueRequest>,
}

impl InMemoryQueue {
    pub fn new(sender: mpsc::Sender<QueueRequest>) -> Self {
        Self { sender }
    }

    /// Removes and returns up to `max_messages` records from the head of `queue_name`.
    pub async fn receive_batch(&self, queue_name: &str, max_messages: usize) -> Result<QueueBatch, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(QueueRequest::Receive {
                queue_name: queue_name.to_string(),
                max_messages,
                respond_to,
            })
            .await
            .map_err(|_| TransportError::Closed)?;
        response.await.map_err(|_| TransportError::Dropped)?
    }

    /// Number of messages waiting in `queue_name`.
    pub async fn depth(&self, queue_name: &str) -> Result<usize, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(QueueRequest::Depth {
                queue_name: queue_name.to_string(),
                respond_to,
            })
            .await
            .map_err(|_| TransportError::Closed)?;
        response.await.map_err(|_| TransportError::Dropped)?
    }
}

#[async_trait]
impl QueueTransport for InMemoryQueue {
    async fn send_message(&self, message: OutboundMessage) -> Result<SendReceipt, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(QueueRequest::Send { message, respond_to })
            .await
            .map_err(|_| TransportError::Closed)?;
        response.await.map_err(|_| TransportError::Dropped)?
    }
}
