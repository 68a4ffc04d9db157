//! Turns raw processor records into the final [`HardwareTopology`].

use foldhash::HashMap;
use itertools::Itertools;
use tracing::debug;

use crate::cpu_record::CpuRecord;
use crate::{
    HardwareTopology, MachineTopology, NumaNodeId, NumaRank, OsContextId, PackageId, PackageRank,
    ThreadIndex, ThreadTopology, allowed_set,
};

/// Builds the topology from the records of every processor the operating system reports (with
/// NUMA nodes already resolved) and the set of processors the process is allowed to use
/// (`None` meaning all of them).
pub(crate) fn build(
    mut records: Vec<CpuRecord>,
    allowed: Option<&[OsContextId]>,
) -> HardwareTopology {
    classify_smt(&mut records);

    allowed_set::mark_valid(&mut records, allowed);
    records.retain(|record| record.is_valid);

    // Removing processors changes which records are adjacent, so the classification from before
    // filtering no longer holds. A processor whose primary was removed is now a primary itself.
    classify_smt(&mut records);

    let machine = count(&records);
    let threads = renumber(&records);

    debug!(
        max_sockets = machine.max_sockets(),
        max_threads = machine.max_threads(),
        max_cores = machine.max_cores(),
        max_numa_nodes = machine.max_numa_nodes(),
        reported_siblings = records.iter().map(|r| r.siblings).max().unwrap_or_default(),
        reported_cpu_cores = records.iter().map(|r| r.cpu_cores).max().unwrap_or_default(),
        "hardware topology built"
    );

    HardwareTopology::new(machine, threads)
}

/// Classifies SMT siblings and puts the records into topology order.
///
/// With all SMT flags cleared, sorting by the topology key orders the records by package, core
/// and processor, making the logical processors of each core adjacent. Every record after the
/// first one of its core is a sibling. Sorting again then moves the siblings behind all the
/// primaries.
fn classify_smt(records: &mut [CpuRecord]) {
    for record in records.iter_mut() {
        record.is_smt = false;
    }

    records.sort_unstable_by_key(CpuRecord::sort_key);
    mark_smt(records);
    records.sort_unstable_by_key(CpuRecord::sort_key);
}

fn mark_smt(records: &mut [CpuRecord]) {
    let mut previous: Option<CpuRecord> = None;

    for record in records.iter_mut() {
        record.is_smt = previous.is_some_and(|previous| previous.shares_core_with(record));
        previous = Some(*record);
    }
}

fn count(records: &[CpuRecord]) -> MachineTopology {
    MachineTopology::new(
        records.iter().map(|r| r.package_id).unique().count(),
        records.len(),
        records
            .iter()
            .map(|r| (r.package_id, r.core_id))
            .unique()
            .count(),
        records.iter().map(|r| r.numa_node).unique().count(),
    )
}

/// Assigns compact IDs and ranks in a single pass over the records in topology order.
///
/// Ranks are handed out in the order the package and NUMA identifiers are first seen, which is
/// not necessarily the numeric order of the identifiers.
fn renumber(records: &[CpuRecord]) -> Vec<ThreadTopology> {
    // Package ID -> (rank, compact ID of the first thread seen in the package).
    let mut packages: HashMap<PackageId, (PackageRank, ThreadIndex)> = HashMap::default();
    let mut numa_nodes: HashMap<NumaNodeId, NumaRank> = HashMap::default();
    let mut cumulative_max_package_rank: PackageRank = 0;

    records
        .iter()
        .enumerate()
        .map(|(thread_id, record)| {
            let next_package_rank = packages.len();
            let (package_rank, package_leader) = *packages
                .entry(record.package_id)
                .or_insert((next_package_rank, thread_id));

            let next_numa_rank = numa_nodes.len();
            let numa_rank = *numa_nodes
                .entry(record.numa_node)
                .or_insert(next_numa_rank);

            cumulative_max_package_rank = cumulative_max_package_rank.max(package_rank);

            ThreadTopology {
                thread_id,
                package_leader,
                package_rank,
                numa_rank,
                cumulative_max_package_rank,
                os_context: record.os_context,
                numa_node: record.numa_node,
                package_id: record.package_id,
                core_id: record.core_id,
                is_smt_sibling: record.is_smt,
            }
        })
        .collect()
}

#[allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::indexing_slicing,
    reason = "we need not worry in tests"
)]
