use crate::{CoreId, NumaNodeId, OsContextId, PackageId};

/// What the operating system reports about one logical processor, plus the flags the build
/// pipeline computes for it.
///
/// Records only exist while a topology is being built and are discarded afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CpuRecord {
    pub(crate) os_context: OsContextId,
    pub(crate) package_id: PackageId,
    pub(crate) siblings: u32,
    pub(crate) core_id: CoreId,
    pub(crate) cpu_cores: u32,
    pub(crate) numa_node: NumaNodeId,

    /// Whether the current process is allowed to use this processor.
    pub(crate) is_valid: bool,

    /// Whether this processor is a secondary hyperthread of a core whose primary sorts earlier.
    pub(crate) is_smt: bool,
}

impl CpuRecord {
    /// A record for a processor that is its own core in package 0, with nothing computed yet.
    pub(crate) fn new(os_context: OsContextId) -> Self {
        Self {
            os_context,
            package_id: 0,
            siblings: 1,
            core_id: os_context,
            cpu_cores: 1,
            numa_node: 0,
            is_valid: true,
            is_smt: false,
        }
    }

    /// The key that defines the topology order: primaries before SMT siblings, then by package,
    /// core and processor.
    pub(crate) fn sort_key(&self) -> (bool, PackageId, CoreId, OsContextId) {
        (self.is_smt, self.package_id, self.core_id, self.os_context)
    }

    /// Whether the two records are logical processors of the same physical core.
    pub(crate) fn shares_core_with(&self, other: &Self) -> bool {
        self.package_id == other.package_id && self.core_id == other.core_id
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn primaries_sort_before_siblings() {
        let primary = CpuRecord {
            package_id: 1,
            core_id: 5,
            ..CpuRecord::new(9)
        };
        let sibling = CpuRecord {
            is_smt: true,
            ..CpuRecord::new(0)
        };

        assert!(primary.sort_key() < sibling.sort_key());
    }

    #[test]
    fn same_core_requires_same_package() {
        let a = CpuRecord {
            package_id: 0,
            core_id: 3,
            ..CpuRecord::new(0)
        };
        let b = CpuRecord {
            package_id: 1,
            core_id: 3,
            ..CpuRecord::new(1)
        };
        let c = CpuRecord {
            package_id: 0,
            core_id: 3,
            ..CpuRecord::new(2)
        };

        assert!(!a.shares_core_with(&b));
        assert!(a.shares_core_with(&c));
    }
}
