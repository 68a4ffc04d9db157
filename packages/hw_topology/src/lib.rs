#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Parallel runtimes need to know the shape of the hardware before they start placing worker
//! threads: how many physical packages (sockets) there are, how many cores each has, which
//! logical processors are hyperthread (SMT) siblings of each other, which NUMA memory node each
//! processor belongs to and which of all these processors the current process is actually
//! allowed to use.
//!
//! This package discovers that information once per process, filters it down to the processors
//! the process may use and renumbers the remaining hardware into compact ranks that a scheduler
//! can use directly as array indices. It also provides a primitive to bind the calling thread to
//! one specific hardware context.
//!
//! # Quick start
//!
//! ```rust
//! // examples/print_topology.rs
//! let topology = hw_topology::hardware_topology();
//! let machine = topology.machine();
//!
//! println!(
//!     "{} threads on {} cores in {} packages and {} NUMA nodes",
//!     machine.max_threads(),
//!     machine.max_cores(),
//!     machine.max_sockets(),
//!     machine.max_numa_nodes()
//! );
//!
//! for thread in topology.threads() {
//!     println!("{thread}");
//! }
//! ```
//!
//! The topology is built on first access and cached for the lifetime of the process. Every call
//! returns an independent copy of the same data, so the result can be kept around without any
//! synchronization.
//!
//! # Ordering and compact ranks
//!
//! Threads are ordered so that the primary thread of every core comes before any SMT sibling,
//! with packages and cores in ascending order. The position of a thread in this order is its
//! compact thread ID. Package and NUMA node identifiers reported by the operating system can be
//! sparse, so each thread also carries a compact package rank and a compact NUMA rank, assigned
//! in the order the identifiers are first seen when walking the threads in order.
//!
//! # Binding threads
//!
//! ```rust
//! // examples/bind_to_every_context.rs
//! let topology = hw_topology::hardware_topology();
//!
//! if let Some(thread) = topology.threads().first() {
//!     let bound = hw_topology::bind_current_thread(thread.os_context());
//!     println!("Bound to OS context {}: {bound}", thread.os_context());
//! }
//! ```
//!
//! Binding failures are never fatal. They are reported through a `false` return value and a
//! warning emitted via [`tracing`], leaving the decision of whether to proceed unbound to the
//! caller.
//!
//! # Diagnostics
//!
//! Degraded conditions (NUMA information unavailable, thread affinity unsupported, a failed
//! bind) are reported as `tracing` warnings. This package never installs a subscriber, so the
//! application decides where such warnings end up.
//!
//! Conditions that make it impossible to form a topology at all (e.g. `/proc/cpuinfo` cannot be
//! read) are fatal: [`TopologyCache::get()`] panics with a description of the operating system
//! error. Use [`TopologyCache::try_get()`] to receive the [`Error`] instead.
//!
//! # Operating system compatibility
//!
//! Topology discovery and thread binding are implemented for Linux. On other operating systems
//! (and under Miri) a fallback is used: every processor reported by
//! `std::thread::available_parallelism()` is treated as its own core in a single package and
//! NUMA node, and binding always reports failure.
//!
//! # Cargo features
//!
//! * `libnuma` (default) - resolve NUMA nodes via `libnuma`, loaded dynamically at runtime when
//!   present on the system. Without it (or without the library on the system), the NUMA node of
//!   every processor is assumed to be its physical package.

mod affinity;
mod allowed_set;
mod builder;
mod cache;
mod cpu_record;
mod cpuinfo;
mod error;
mod primitive_types;
mod topology;
#[cfg(any(test, miri, not(target_os = "linux")))]
mod warn_once;

pub(crate) mod pal;

pub use affinity::*;
pub use cache::*;
pub use error::*;
pub use primitive_types::*;
pub use topology::*;
