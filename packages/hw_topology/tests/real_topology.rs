//! Verifies topology discovery and thread binding against the real operating system.
//!
//! The exact hardware is unknown, so these tests check the structural properties every valid
//! topology must have rather than specific counts.

#![cfg(target_os = "linux")]
#![allow(
    clippy::indexing_slicing,
    reason = "we need not worry in tests"
)]

use std::collections::BTreeSet;
use std::thread;

use hw_topology::{AffinityBinder, TopologyCache, bind_current_thread, hardware_topology};

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot call platform APIs.
fn topology_is_consistent() {
    let topology = hardware_topology();
    let machine = topology.machine();
    let threads = topology.threads();

    // This code is running, so at least one processor is usable.
    assert!(machine.max_threads() >= 1);
    assert_eq!(threads.len(), machine.max_threads());

    assert!(machine.max_sockets() >= 1);
    assert!(machine.max_cores() >= machine.max_sockets());
    assert!(machine.max_cores() <= machine.max_threads());
    assert!(machine.max_numa_nodes() >= 1);
    assert!(machine.max_numa_nodes() <= machine.max_threads());

    let mut seen_sibling = false;
    let mut running_max_package_rank = 0;

    for (index, thread) in threads.iter().enumerate() {
        assert_eq!(thread.thread_id(), index);
        assert!(thread.package_rank() < machine.max_sockets());
        assert!(thread.numa_rank() < machine.max_numa_nodes());

        // Every primary comes before every sibling.
        if thread.is_smt_sibling() {
            seen_sibling = true;
        } else {
            assert!(!seen_sibling, "primary {thread} comes after an SMT sibling");
        }

        running_max_package_rank = running_max_package_rank.max(thread.package_rank());
        assert_eq!(thread.cumulative_max_package_rank(), running_max_package_rank);

        let leader = &threads[thread.package_leader()];
        assert!(leader.thread_id() <= thread.thread_id());
        assert_eq!(leader.package_id(), thread.package_id());
        assert_eq!(leader.package_rank(), thread.package_rank());
    }

    let os_contexts = threads
        .iter()
        .map(|t| t.os_context())
        .collect::<BTreeSet<_>>();
    assert_eq!(os_contexts.len(), threads.len());

    let package_ranks = threads
        .iter()
        .map(|t| t.package_rank())
        .collect::<BTreeSet<_>>();
    assert_eq!(package_ranks, (0..machine.max_sockets()).collect());

    let numa_ranks = threads
        .iter()
        .map(|t| t.numa_rank())
        .collect::<BTreeSet<_>>();
    assert_eq!(numa_ranks, (0..machine.max_numa_nodes()).collect());
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot call platform APIs.
fn repeated_discovery_is_identical() {
    let first = hardware_topology();
    let second = hardware_topology();
    let independent = TopologyCache::new().get();

    assert_eq!(first, second);
    assert_eq!(first, independent);
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot call platform APIs.
fn topology_matches_process_affinity() {
    // The test harness does not restrict its threads beyond the process limits, so the affinity
    // of a fresh thread is exactly the set of processors the process may use.
    let affinity = thread::spawn(|| AffinityBinder::current().current_thread_os_contexts())
        .join()
        .unwrap()
        .unwrap();

    let topology_contexts = hardware_topology()
        .threads()
        .iter()
        .map(|t| t.os_context())
        .collect::<BTreeSet<_>>();

    assert_eq!(topology_contexts, affinity.into_iter().collect());
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot call platform APIs.
fn bind_to_every_context() {
    let topology = hardware_topology();

    thread::scope(|s| {
        for thread in topology.threads() {
            s.spawn(move || {
                assert!(bind_current_thread(thread.os_context()));

                assert_eq!(
                    AffinityBinder::current().current_thread_os_contexts(),
                    Some(vec![thread.os_context()])
                );
            });
        }
    });
}
