use crate::framework::{CommunicationProtocol, ProtocolError};
use crate::model::DispatchUnit;
use crate::protocol::{ConfigError, ProtocolConfig, QueueCommunicationProtocol};
use crate::transport::{InMemoryQueue, QueueActor};
use tracing::{debug, error, info};

/// Default request buffer of the in-memory queue service.
const QUEUE_BUFFER: usize = 64;

/// A protocol wired to a running in-memory queue service.
///
/// `QueueSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the queue service task
/// - **Wiring**: Building the protocol on a handle to that service
/// - **Polling**: Pulling batches off a queue and translating them
///
/// # Example
///
/// ```ignore
/// let system = QueueSystem::new(ProtocolConfig::default())?;
///
/// let to = EntityRef::new("orders", "42")?;
/// system.protocol.send(&to, Command::new("Ship", json!({}))).await?;
///
/// for unit in system.poll("orders", 10).await? {
///     // hand unit.commands to unit.receiver
/// }
///
/// system.shutdown().await?;
/// ```
pub struct QueueSystem {
    /// Protocol bound to the in-memory queue service
    pub protocol: QueueCommunicationProtocol,

    /// Direct handle to the queue service, for draining and inspection
    pub queue: InMemoryQueue,

    handle: tokio::task::JoinHandle<()>,
}

impl QueueSystem {
    /// Starts a queue service that creates queues on first use.
    ///
    /// Nothing is spawned if `config` is rejected.
    pub fn new(config: ProtocolConfig) -> Result<Self, ConfigError> {
        let (actor, queue) = QueueActor::new(QUEUE_BUFFER);
        Self::start(config, actor, queue)
    }

    /// Starts a queue service that only knows `queue_names`.
    pub fn with_queues<I, S>(config: ProtocolConfig, queue_names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (actor, queue) = QueueActor::with_queues(QUEUE_BUFFER, queue_names);
        Self::start(config, actor, queue)
    }

    fn start(config: ProtocolConfig, actor: QueueActor, queue: InMemoryQueue) -> Result<Self, ConfigError> {
        let protocol = QueueCommunicationProtocol::new(config, queue.clone())?;
        let handle = tokio::spawn(actor.run());
        Ok(Self { protocol, queue, handle })
    }

    /// Takes up to `max_messages` from `queue_name` and translates them into dispatch units.
    pub async fn poll(&self, queue_name: &str, max_messages: usize) -> Result<Vec<DispatchUnit>, ProtocolError> {
        let batch = self.queue.receive_batch(queue_name, max_messages).await?;
        debug!(queue = %queue_name, records = batch.len(), "Polled");
        self.protocol.receive(Some(&batch))
    }

    /// Gracefully shuts down the queue service.
    ///
    /// Dropping the protocol and the queue handle closes the request channel;
    /// the service drains its loop and exits. Clones of the protocol made
    /// elsewhere keep the service alive until they are dropped too.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down queue system...");

        drop(self.protocol);
        drop(self.queue);

        if let Err(e) = self.handle.await {
            error!("Queue service task failed: {:?}", e);
            return Err(format!("Queue service task failed: {:?}", e));
        }

        info!("Queue system shutdown complete.");
        Ok(())
    }
}
