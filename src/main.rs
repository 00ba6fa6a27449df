//! Demo: send commands to a few entities through the in-memory queue and
//! translate what comes back out.

use entity_queue_protocol::framework::CommunicationProtocol;
use entity_queue_protocol::lifecycle::{setup_tracing, QueueSystem};
use entity_queue_protocol::model::{Command, EntityRef};
use entity_queue_protocol::protocol::ProtocolConfig;
use serde_json::json;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let system = QueueSystem::new(ProtocolConfig::from_env())?;
    let customer = EntityRef::new("customers", "alice")?;
    let orders = [EntityRef::new("orders", "1001")?, EntityRef::new("orders", "1002")?];

    let span = tracing::info_span!("producing");
    async {
        for (n, order) in orders.iter().enumerate() {
            for step in ["Create", "AddItem", "Submit"] {
                let command = Command::new(step, json!({ "step": step, "n": n }))
                    .with_sender(Some(customer.clone()));
                system.protocol.send(order, command).await?;
            }
        }
        let depth = system.queue.depth("orders").await?;
        info!(depth, "Commands queued");
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    for unit in system.poll("orders", 10).await? {
        let types: Vec<&str> = unit.commands.iter().map(|c| c.command_type()).collect();
        info!(receiver = %unit.receiver, commands = ?types, "Dispatch");
    }

    system.shutdown().await?;
    Ok(())
}
