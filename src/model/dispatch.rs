use super::{Command, EntityRef};

/// A receiver paired with the commands destined for it, in delivery order.
///
/// Produced by [`CommunicationProtocol::receive`](crate::framework::CommunicationProtocol::receive);
/// the runtime hands `commands` to the entity named by `receiver`, one by one.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchUnit {
    pub receiver: EntityRef,
    pub commands: Vec<Command>,
}

impl DispatchUnit {
    pub fn new(receiver: EntityRef, commands: Vec<Command>) -> Self {
        Self { receiver, commands }
    }
}
