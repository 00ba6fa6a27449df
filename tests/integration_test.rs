use entity_queue_protocol::framework::{CommunicationProtocol, ProtocolError};
use entity_queue_protocol::lifecycle::QueueSystem;
use entity_queue_protocol::model::{Command, EntityRef};
use entity_queue_protocol::protocol::{
    AddressingConfig, AttributeNames, ConfigError, GroupSource, OrderingKeyScheme, ProtocolConfig, QueueNaming,
};
use entity_queue_protocol::transport::{TransportError, MESSAGE_GROUP_ID};
use serde_json::json;

fn entity(s: &str) -> EntityRef {
    EntityRef::parse(s).expect("valid ref")
}

/// Full round trip: send through the protocol, drain the queue, receive.
#[tokio::test]
async fn test_send_then_receive_round_trip() {
    let system = QueueSystem::new(ProtocolConfig::default()).expect("valid config");
    let alice = entity("users:alice");

    system
        .protocol
        .send(&entity("orders:1"), Command::new("Create", json!({ "qty": 1 })).with_sender(Some(alice.clone())))
        .await
        .expect("send failed");
    system
        .protocol
        .send(&entity("orders:2"), Command::new("Create", json!({ "qty": 2 })))
        .await
        .expect("send failed");
    system
        .protocol
        .send(&entity("orders:1"), Command::new("Submit", json!(null)))
        .await
        .expect("send failed");

    assert_eq!(system.queue.depth("orders").await.unwrap(), 3);

    let units = system.poll("orders", 10).await.expect("poll failed");
    assert_eq!(units.len(), 2);

    let first = units.iter().find(|u| u.receiver == entity("orders:1")).expect("orders:1 missing");
    let types: Vec<_> = first.commands.iter().map(|c| c.command_type()).collect();
    assert_eq!(types, vec!["Create", "Submit"]);
    assert_eq!(first.commands[0].sender(), Some(&alice));
    assert_eq!(first.commands[0].body(), &json!({ "qty": 1 }));
    assert_eq!(first.commands[1].sender(), None);

    let second = units.iter().find(|u| u.receiver == entity("orders:2")).expect("orders:2 missing");
    assert_eq!(second.commands.len(), 1);

    system.shutdown().await.expect("Failed to shutdown system");
}

/// Each entity type gets its own queue.
#[tokio::test]
async fn test_destinations_map_to_queues_by_type() {
    let system = QueueSystem::new(ProtocolConfig::default()).expect("valid config");

    system.protocol.send(&entity("orders:1"), Command::new("A", json!(1))).await.unwrap();
    system.protocol.send(&entity("users:1"), Command::new("B", json!(2))).await.unwrap();

    assert_eq!(system.queue.depth("orders").await.unwrap(), 1);
    assert_eq!(system.queue.depth("users").await.unwrap(), 1);

    let users = system.poll("users", 10).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].receiver, entity("users:1"));

    system.shutdown().await.unwrap();
}

/// Concurrent producers for the same entity share one message group and the
/// queue keeps each producer's commands in order.
#[tokio::test]
async fn test_concurrent_producers_share_group() {
    let system = QueueSystem::new(ProtocolConfig::default()).expect("valid config");
    let target = entity("accounts:shared");

    let mut handles = vec![];
    for producer in 0..8 {
        let protocol = system.protocol.clone();
        let to = target.clone();
        handles.push(tokio::spawn(async move {
            for seq in 0..5 {
                let command = Command::new("Deposit", json!({ "producer": producer, "seq": seq }));
                protocol.send(&to, command).await?;
            }
            Ok::<_, ProtocolError>(())
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("producer failed");
    }

    let batch = system.queue.receive_batch("accounts", 100).await.unwrap();
    assert_eq!(batch.len(), 40);
    let first_group = batch.records[0].system_attribute(MESSAGE_GROUP_ID).unwrap().to_string();
    assert!(batch
        .records
        .iter()
        .all(|r| r.system_attribute(MESSAGE_GROUP_ID) == Some(first_group.as_str())));

    let units = system.protocol.receive(Some(&batch)).unwrap();
    assert_eq!(units.len(), 1);
    for producer in 0..8 {
        let seqs: Vec<i64> = units[0]
            .commands
            .iter()
            .filter(|c| c.body()["producer"] == producer)
            .map(|c| c.body()["seq"].as_i64().unwrap())
            .collect();
        assert_eq!(seqs, vec![0, 1, 2, 3, 4], "producer {producer} reordered");
    }

    system.shutdown().await.unwrap();
}

/// A send to a queue the service does not know fails; nothing is enqueued.
#[tokio::test]
async fn test_unknown_queue_fails_send() {
    let system = QueueSystem::with_queues(ProtocolConfig::default(), ["orders"]).expect("valid config");

    let err = system
        .protocol
        .send(&entity("invoices:1"), Command::new("A", json!(1)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Transport(TransportError::QueueNotFound(ref q)) if q == "invoices"
    ));
    assert_eq!(system.queue.depth("orders").await.unwrap(), 0);

    system.shutdown().await.unwrap();
}

/// Reading receivers from the message group only works when the group is the
/// canonical reference; with digest groups the system refuses to start.
#[tokio::test]
async fn test_group_id_routing_needs_canonical_keys() {
    let digest_groups = ProtocolConfig::default().with_addressing(AddressingConfig {
        group_source: GroupSource::MessageGroupId,
        ..AddressingConfig::default()
    });
    assert!(matches!(
        QueueSystem::new(digest_groups),
        Err(ConfigError::UnroutableGroupId(OrderingKeyScheme::Sha256))
    ));

    let canonical_groups = ProtocolConfig::default().with_addressing(AddressingConfig {
        queue_naming: QueueNaming::Fixed("inbox.fifo".into()),
        ordering_key: OrderingKeyScheme::CanonicalRef,
        group_source: GroupSource::MessageGroupId,
        ..AddressingConfig::default()
    });
    let system = QueueSystem::new(canonical_groups).expect("valid config");

    system.protocol.send(&entity("orders:1"), Command::new("A", json!(1))).await.unwrap();
    system.protocol.send(&entity("users:9"), Command::new("B", json!(2))).await.unwrap();

    let units = system.poll("inbox.fifo", 10).await.unwrap();
    assert_eq!(units.len(), 2);
    assert!(units.iter().any(|u| u.receiver == entity("orders:1")));
    assert!(units.iter().any(|u| u.receiver == entity("users:9")));

    system.shutdown().await.unwrap();
}

/// Two routing attributes with one name would overwrite each other on send.
#[tokio::test]
async fn test_colliding_attribute_names_are_rejected() {
    let colliding = ProtocolConfig::default().with_addressing(AddressingConfig {
        attributes: AttributeNames {
            receiver: "R".into(),
            sender: "R".into(),
            command_type: "T".into(),
        },
        ..AddressingConfig::default()
    });

    assert!(matches!(
        QueueSystem::new(colliding),
        Err(ConfigError::DuplicateAttribute(ref name)) if name == "R"
    ));
}
