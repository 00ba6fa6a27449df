//! Pure data structures exchanged between the runtime and the queue protocol.

pub mod command;
pub mod dispatch;
pub mod entity_ref;

pub use command::*;
pub use dispatch::*;
pub use entity_ref::*;
