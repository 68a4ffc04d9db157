use derive_more::Display;

use crate::{CoreId, NumaNodeId, NumaRank, OsContextId, PackageId, PackageRank, ThreadIndex};

/// The complete hardware topology available to the current process: aggregate counts plus one
/// entry per usable hardware thread.
///
/// Obtained via [`hardware_topology()`][crate::hardware_topology] or a
/// [`TopologyCache`][crate::TopologyCache]. Every instance is an independent copy of immutable
/// data and can be retained for the lifetime of the process.
///
/// # Example
///
/// ```
/// let topology = hw_topology::hardware_topology();
///
/// for package_rank in 0..topology.machine().max_sockets() {
///     let os_contexts = topology
///         .threads_in_package(package_rank)
///         .map(|thread| thread.os_context())
///         .collect::<Vec<_>>();
///
///     println!("Package {package_rank} has OS contexts {os_contexts:?}");
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HardwareTopology {
    machine: MachineTopology,
    threads: Vec<ThreadTopology>,
}

impl HardwareTopology {
    pub(crate) fn new(machine: MachineTopology, threads: Vec<ThreadTopology>) -> Self {
        Self { machine, threads }
    }

    /// Aggregate counts over all usable hardware.
    #[must_use]
    pub fn machine(&self) -> &MachineTopology {
        &self.machine
    }

    /// All usable hardware threads, indexed by compact thread ID.
    ///
    /// Primary threads of every core come first, followed by SMT siblings. Within each group,
    /// threads are ordered by package, core and OS context. The slice is empty if the process is
    /// not allowed to use any processor.
    #[must_use]
    pub fn threads(&self) -> &[ThreadTopology] {
        &self.threads
    }

    /// The thread with the given compact thread ID, if it exists.
    #[must_use]
    pub fn thread(&self, thread_id: ThreadIndex) -> Option<&ThreadTopology> {
        self.threads.get(thread_id)
    }

    /// The threads in the package with the given compact package rank, in topology order.
    pub fn threads_in_package(
        &self,
        package_rank: PackageRank,
    ) -> impl Iterator<Item = &ThreadTopology> {
        self.threads
            .iter()
            .filter(move |thread| thread.package_rank == package_rank)
    }
}

/// Aggregate counts describing the hardware available to the current process.
///
/// Each count is the number of distinct entities among the processors the process is allowed to
/// use. Processors outside the allowed set do not contribute to any count.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct MachineTopology {
    max_sockets: usize,
    max_threads: usize,
    max_cores: usize,
    max_numa_nodes: usize,
}

impl MachineTopology {
    pub(crate) fn new(
        max_sockets: usize,
        max_threads: usize,
        max_cores: usize,
        max_numa_nodes: usize,
    ) -> Self {
        Self {
            max_sockets,
            max_threads,
            max_cores,
            max_numa_nodes,
        }
    }

    /// Number of distinct physical packages (sockets).
    #[must_use]
    pub fn max_sockets(&self) -> usize {
        self.max_sockets
    }

    /// Number of usable hardware threads (logical processors).
    #[must_use]
    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// Number of distinct physical cores, counting each (package, core) pair once.
    #[must_use]
    pub fn max_cores(&self) -> usize {
        self.max_cores
    }

    /// Number of distinct NUMA nodes.
    #[must_use]
    pub fn max_numa_nodes(&self) -> usize {
        self.max_numa_nodes
    }
}

/// Placement information for one usable hardware thread.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display(
    "thread {thread_id} (OS context {os_context}, package rank {package_rank}, leader {package_leader}, NUMA rank {numa_rank})"
)]
pub struct ThreadTopology {
    pub(crate) thread_id: ThreadIndex,
    pub(crate) package_leader: ThreadIndex,
    pub(crate) package_rank: PackageRank,
    pub(crate) numa_rank: NumaRank,
    pub(crate) cumulative_max_package_rank: PackageRank,
    pub(crate) os_context: OsContextId,
    pub(crate) numa_node: NumaNodeId,
    pub(crate) package_id: PackageId,
    pub(crate) core_id: CoreId,
    pub(crate) is_smt_sibling: bool,
}

impl ThreadTopology {
    /// The compact thread ID, equal to the position of this thread in
    /// [`HardwareTopology::threads()`].
    #[must_use]
    pub fn thread_id(&self) -> ThreadIndex {
        self.thread_id
    }

    /// The compact thread ID of the first thread (in topology order) in the same package.
    ///
    /// For the leader itself, this is its own thread ID.
    #[must_use]
    pub fn package_leader(&self) -> ThreadIndex {
        self.package_leader
    }

    /// Dense 0-based rank of the package this thread belongs to.
    #[must_use]
    pub fn package_rank(&self) -> PackageRank {
        self.package_rank
    }

    /// Dense 0-based rank of the NUMA node this thread belongs to.
    #[must_use]
    pub fn numa_rank(&self) -> NumaRank {
        self.numa_rank
    }

    /// The highest package rank of any thread up to and including this one.
    ///
    /// A scheduler activating threads in topology order can use this to tell how many packages
    /// are in use when the first `thread_id + 1` threads are active.
    #[must_use]
    pub fn cumulative_max_package_rank(&self) -> PackageRank {
        self.cumulative_max_package_rank
    }

    /// The operating system identifier of the hardware context, for use with
    /// [`bind_current_thread()`][crate::bind_current_thread].
    #[must_use]
    pub fn os_context(&self) -> OsContextId {
        self.os_context
    }

    /// The operating system identifier of the NUMA node this thread belongs to.
    #[must_use]
    pub fn numa_node(&self) -> NumaNodeId {
        self.numa_node
    }

    /// The operating system identifier of the package this thread belongs to.
    #[must_use]
    pub fn package_id(&self) -> PackageId {
        self.package_id
    }

    /// The operating system identifier of the core within its package.
    #[must_use]
    pub fn core_id(&self) -> CoreId {
        self.core_id
    }

    /// Whether this thread is a secondary hyperthread of a core whose primary thread comes
    /// earlier in topology order.
    #[must_use]
    pub fn is_smt_sibling(&self) -> bool {
        self.is_smt_sibling
    }
}
