use std::fmt::Debug;
use std::io;

use crate::{NumaNodeId, OsContextId};

/// The subset of `libnuma` that topology discovery uses.
///
/// The library is optional: it may be absent from the system or disabled at build time, in which
/// case the implementation reports itself as unavailable.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait NumaLibrary: Debug + Send + Sync + 'static {
    /// Whether the library is present and reports NUMA support (`numa_available() >= 0`).
    fn is_available(&self) -> bool;

    /// The number of NUMA nodes configured in the system (`numa_num_configured_nodes()`).
    ///
    /// Only meaningful if [`is_available()`][Self::is_available] returned `true`.
    fn configured_node_count(&self) -> i32;

    /// The NUMA node the given processor belongs to (`numa_node_of_cpu()`).
    ///
    /// Only meaningful if [`is_available()`][Self::is_available] returned `true`.
    fn node_of_cpu(&self, os_context: OsContextId) -> io::Result<NumaNodeId>;
}
