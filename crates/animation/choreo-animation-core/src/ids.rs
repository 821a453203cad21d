//! Identifiers for running animation instances.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

/// Monotonic allocator shared by every instance in the process.
/// IDs are opaque and only used to correlate log lines.
#[inline]
pub(crate) fn alloc_instance() -> InstanceId {
    InstanceId(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
}
