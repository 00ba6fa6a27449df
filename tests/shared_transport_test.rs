//! Runs in its own test binary: the shared transport is process-wide.

use entity_queue_protocol::framework::mock::MockTransport;
use entity_queue_protocol::framework::CommunicationProtocol;
use entity_queue_protocol::model::{Command, EntityRef};
use entity_queue_protocol::protocol::{
    AddressingConfig, ConfigError, GroupSource, ProtocolConfig, QueueCommunicationProtocol,
};
use entity_queue_protocol::transport::{installed_transport, shared_transport};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_shared_transport_initializes_once() {
    assert!(installed_transport().is_none());

    let rejected = ProtocolConfig::default().with_addressing(AddressingConfig {
        group_source: GroupSource::MessageGroupId,
        ..AddressingConfig::default()
    });
    let result = QueueCommunicationProtocol::with_shared_transport(rejected, || -> MockTransport {
        panic!("a rejected config must not build the shared transport")
    });
    assert!(matches!(result, Err(ConfigError::UnroutableGroupId(_))));
    assert!(installed_transport().is_none());

    let mock = MockTransport::new();
    mock.expect_send().return_ok();
    mock.expect_send().return_ok();

    let first = QueueCommunicationProtocol::with_shared_transport(ProtocolConfig::default(), || mock.clone()).unwrap();
    let second = QueueCommunicationProtocol::with_shared_transport(ProtocolConfig::default(), || -> MockTransport {
        panic!("shared transport must only be built once")
    })
    .unwrap();

    let a = shared_transport(MockTransport::new);
    let b = installed_transport().unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    let to = EntityRef::parse("carts:1").unwrap();
    first.send(&to, Command::new("A", json!(1))).await.unwrap();
    second.send(&to, Command::new("B", json!(2))).await.unwrap();

    assert_eq!(mock.sent_messages().len(), 2);
    mock.verify();
}
