//! Process-wide transport handle.
//!
//! Queue clients are expensive to build and safe to share, so a process
//! normally holds exactly one. The handle is initialized on first use and is
//! immutable afterwards; later initializers are ignored.

use super::QueueTransport;
use once_cell::sync::OnceCell;
use std::sync::Arc;

static SHARED_TRANSPORT: OnceCell<Arc<dyn QueueTransport>> = OnceCell::new();

/// Returns the process-wide transport, building it with `init` on first call.
pub fn shared_transport<T, F>(init: F) -> Arc<dyn QueueTransport>
where
    T: QueueTransport + 'static,
    F: FnOnce() -> T,
{
    SHARED_TRANSPORT
        .get_or_init(|| {
            tracing::debug!("Initializing shared transport");
            let transport: Arc<dyn QueueTransport> = Arc::new(init());
            transport
        })
        .clone()
}

/// The process-wide transport, if one has been initialized.
pub fn installed_transport() -> Option<Arc<dyn QueueTransport>> {
    SHARED_TRANSPORT.get().cloned()
}
