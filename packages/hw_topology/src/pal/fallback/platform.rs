use std::num::NonZeroUsize;
use std::thread;

use tracing::warn;

use crate::cpu_record::CpuRecord;
use crate::pal::Platform;
use crate::warn_once::WarnOnce;
use crate::{OsContextId, Result};

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
#[cfg_attr(
    all(test, target_os = "linux", not(miri)),
    expect(dead_code, reason = "only the primary implementation uses the singleton")
)]
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform::new();

/// Fallback platform implementation for operating systems without native support.
///
/// This implementation provides graceful degradation on unsupported platforms by:
/// - Using `std::thread::available_parallelism()` to determine processor count
/// - Treating every processor as its own core in a single package
/// - Approximating the NUMA node of every processor by its package
/// - Reporting every attempt to bind a thread as failed
///
/// This allows code to compile and run on any platform, though without the performance benefits
/// of actual processor binding and topology awareness.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform {
    numa_unavailable_warning: WarnOnce,
    affinity_unsupported_warning: WarnOnce,
}

impl BuildTargetPlatform {
    pub(crate) const fn new() -> Self {
        Self {
            numa_unavailable_warning: WarnOnce::new(),
            affinity_unsupported_warning: WarnOnce::new(),
        }
    }
}

impl Platform for BuildTargetPlatform {
    #[cfg_attr(test, mutants::skip)] // Processor count depends on the test machine.
    fn cpu_records(&self) -> Result<Vec<CpuRecord>> {
        let processor_count = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);

        self.numa_unavailable_warning.call(|| {
            warn!("NUMA information is not available on this platform, assuming NUMA topology matches package topology");
        });

        let siblings = u32::try_from(processor_count).unwrap_or(u32::MAX);

        // New records are their own core in package 0, which is also their approximate NUMA node.
        Ok((0..siblings)
            .map(|os_context| CpuRecord {
                siblings,
                cpu_cores: siblings,
                ..CpuRecord::new(os_context)
            })
            .collect())
    }

    fn allowed_os_contexts(&self) -> Option<Vec<OsContextId>> {
        None
    }

    fn bind_current_thread_to(&self, _os_context: OsContextId) -> bool {
        self.affinity_unsupported_warning.call(|| {
            warn!("cannot set processor affinity on this platform, threads will not be bound to hardware contexts");
        });

        false
    }

    fn current_thread_os_contexts(&self) -> Option<Vec<OsContextId>> {
        None
    }
}
