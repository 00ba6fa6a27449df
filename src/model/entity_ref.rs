//! Typed references to addressable entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the entity type and the entity id in the canonical form.
pub const SEPARATOR: char = ':';

/// Errors produced when constructing or parsing an [`EntityRef`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityRefError {
    /// The input string was empty.
    #[error("Entity reference is empty")]
    Empty,

    /// The input has no `type:id` separator.
    #[error("Entity reference has no ':' separator: {0}")]
    MissingSeparator(String),

    /// The type part is empty or contains the separator.
    #[error("Invalid entity type: {0:?}")]
    InvalidType(String),

    /// The id part is empty.
    #[error("Entity id is empty")]
    EmptyId,
}

/// Reference to a logical entity: a *type* (which names the destination queue)
/// and an *id* unique within that type.
///
/// The canonical string form is `{type}:{id}`. Parsing splits on the first
/// separator, so ids may contain `:` but types may not. This keeps
/// `EntityRef::parse(&r.to_string()) == Ok(r)` for every valid reference.
///
/// # Example
/// ```
/// use entity_queue_protocol::model::EntityRef;
///
/// let account = EntityRef::new("accounts.fifo", "alice").unwrap();
/// assert_eq!(account.to_string(), "accounts.fifo:alice");
/// assert_eq!(EntityRef::parse("accounts.fifo:alice").unwrap(), account);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityRef {
    entity_type: String,
    id: String,
}

impl EntityRef {
    /// Creates a reference, rejecting empty parts and types containing the separator.
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Result<Self, EntityRefError> {
        let entity_type = entity_type.into();
        let id = id.into();

        if entity_type.is_empty() || entity_type.contains(SEPARATOR) {
            return Err(EntityRefError::InvalidType(entity_type));
        }
        if id.is_empty() {
            return Err(EntityRefError::EmptyId);
        }

        Ok(Self { entity_type, id })
    }

    /// Parses the canonical `{type}:{id}` form.
    pub fn parse(input: &str) -> Result<Self, EntityRefError> {
        if input.is_empty() {
            return Err(EntityRefError::Empty);
        }
        let (entity_type, id) = input
            .split_once(SEPARATOR)
            .ok_or_else(|| EntityRefError::MissingSeparator(input.to_string()))?;
        Self::new(entity_type, id)
    }

    /// The entity type. Doubles as the destination queue name.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.entity_type, SEPARATOR, self.id)
    }
}

impl FromStr for EntityRef {
    type Err = EntityRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntityRef {
    type Error = EntityRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntityRef> for String {
    fn from(value: EntityRef) -> Self {
        value.to_string()
    }
}
