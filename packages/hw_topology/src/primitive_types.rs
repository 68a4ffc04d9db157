/// Identifies a logical processor (hardware context) as numbered by the operating system.
///
/// This is the value you pass to [`bind_current_thread()`][crate::bind_current_thread] and the
/// number used by standard operating system tooling such as `taskset`.
///
/// The values are not guaranteed to be contiguous or to start from zero, especially after
/// processors the current process is not allowed to use have been filtered out.
pub type OsContextId = u32;

/// Identifies a physical processor package (socket) as numbered by the operating system.
///
/// Like [`OsContextId`], this is not guaranteed to be contiguous. Use the compact
/// [`PackageRank`] when you need an array index.
pub type PackageId = u32;

/// Identifies a physical core within a package, as numbered by the operating system.
///
/// Core IDs are only unique within a package and are frequently sparse.
pub type CoreId = u32;

/// Identifies a NUMA node as numbered by the operating system (or, when NUMA information is not
/// available, the [`PackageId`] the node is approximated by).
pub type NumaNodeId = u32;

/// Dense 0-based position of a thread in the final topology order.
pub type ThreadIndex = usize;

/// Dense 0-based renumbering of the packages available to the current process.
pub type PackageRank = usize;

/// Dense 0-based renumbering of the NUMA nodes available to the current process.
pub type NumaRank = usize;
