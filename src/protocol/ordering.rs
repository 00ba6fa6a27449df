//! Destination addressing: queue names and ordering keys.
//!
//! Both are pure functions of the destination reference, so every producer in
//! every process computes the same queue and the same message group for the
//! same entity.

use super::config::{OrderingKeyScheme, QueueNaming};
use crate::model::EntityRef;
use sha2::{Digest, Sha256};

/// Longest message group id the queue service accepts, in characters.
pub const MAX_GROUP_ID_LEN: usize = 128;

impl QueueNaming {
    /// Name of the queue that carries messages for `to`.
    pub fn queue_name(&self, to: &EntityRef) -> String {
        match self {
            QueueNaming::PerEntityType => to.entity_type().to_string(),
            QueueNaming::Fixed(name) => name.clone(),
        }
    }
}

impl OrderingKeyScheme {
    /// Message group for `to`. Equal refs always get equal keys.
    pub fn ordering_key(&self, to: &EntityRef) -> String {
        let canonical = to.to_string();
        match self {
            OrderingKeyScheme::Sha256 => digest_key(&canonical),
            OrderingKeyScheme::CanonicalRef => canonical,
        }
    }
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `canonical`.
pub fn digest_key(canonical: &str) -> String {
    hex::encode(Sha256::digest(canonical.as_bytes()))
}
