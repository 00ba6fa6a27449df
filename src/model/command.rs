use super::EntityRef;
use serde_json::Value;

/// A typed message envelope addressed to an entity.
///
/// The body is opaque to this crate: it is carried as a JSON value and only
/// (de)serialized at the queue boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    command_type: String,
    body: Value,
    sender: Option<EntityRef>,
}

impl Command {
    /// Creates a command with no sender.
    pub fn new(command_type: impl Into<String>, body: Value) -> Self {
        Self {
            command_type: command_type.into(),
            body,
            sender: None,
        }
    }

    /// Sets the sender, consuming the command.
    pub fn with_sender(mut self, sender: Option<EntityRef>) -> Self {
        self.sender = sender;
        self
    }

    /// The command type tag. Empty when the wire message carried none.
    pub fn command_type(&self) -> &str {
        &self.command_type
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn sender(&self) -> Option<&EntityRef> {
        self.sender.as_ref()
    }

    /// Splits the command into its parts.
    pub fn into_parts(self) -> (String, Value, Option<EntityRef>) {
        (self.command_type, self.body, self.sender)
    }
}
