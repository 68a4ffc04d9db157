use std::mem;

use tracing::warn;

use crate::cpu_record::CpuRecord;
use crate::pal::Platform;
use crate::pal::linux::{
    Bindings, BindingsFacade, CPUINFO_PATH, Filesystem, FilesystemFacade, NumaLibraryFacade,
    NumaResolver,
};
use crate::{Error, OsContextId, Result, allowed_set, cpuinfo};

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform::new(
    BindingsFacade::target(),
    FilesystemFacade::target(),
    NumaLibraryFacade::target(),
);

/// Number of OS contexts a fixed size `cpu_set_t` can describe (`CPU_SETSIZE`).
const CPU_SET_CAPACITY: usize = size_of::<libc::cpu_set_t>() * 8;

/// The platform that matches the crate's build target.
///
/// You would only use a different platform in unit tests that need to mock the platform.
/// Even then, whenever possible, unit tests should use the real platform for maximum realism.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform {
    bindings: BindingsFacade,
    fs: FilesystemFacade,
    numa: NumaResolver,
}

impl BuildTargetPlatform {
    pub(crate) const fn new(
        bindings: BindingsFacade,
        fs: FilesystemFacade,
        numa_library: NumaLibraryFacade,
    ) -> Self {
        Self {
            bindings,
            fs,
            numa: NumaResolver::new(numa_library),
        }
    }
}

impl Platform for BuildTargetPlatform {
    fn cpu_records(&self) -> Result<Vec<CpuRecord>> {
        let cpuinfo = self
            .fs
            .get_cpuinfo_contents()
            .map_err(|source| Error::ProcessorInfoUnavailable {
                path: CPUINFO_PATH,
                source,
            })?;

        let mut records = cpuinfo::parse(&cpuinfo);

        for record in &mut records {
            record.numa_node = self.numa.resolve(record)?;
        }

        Ok(records)
    }

    fn allowed_os_contexts(&self) -> Option<Vec<OsContextId>> {
        self.fs
            .get_proc_self_status_contents()
            .and_then(|status| allowed_set::parse_status(&status))
    }

    fn bind_current_thread_to(&self, os_context: OsContextId) -> bool {
        let Some(index) = usize::try_from(os_context)
            .ok()
            .filter(|index| *index < CPU_SET_CAPACITY)
        else {
            warn!(
                os_context,
                capacity = CPU_SET_CAPACITY,
                "cannot bind thread to an OS context beyond the capacity of a CPU set"
            );
            return false;
        };

        // SAFETY: Zero-initialized cpu_set_t is a valid value.
        let mut cpu_set: libc::cpu_set_t = unsafe { mem::zeroed() };

        // SAFETY: No safety requirements. The index is within the bounds of the set.
        unsafe {
            libc::CPU_SET(index, &mut cpu_set);
        }

        match self.bindings.set_current_thread_affinity(&cpu_set) {
            Ok(()) => true,
            Err(error) => {
                warn!(os_context, %error, "failed to bind current thread to OS context");
                false
            }
        }
    }

    fn current_thread_os_contexts(&self) -> Option<Vec<OsContextId>> {
        let affinity = match self.bindings.current_thread_affinity() {
            Ok(affinity) => affinity,
            Err(error) => {
                warn!(%error, "failed to get current thread processor affinity");
                return None;
            }
        };

        Some(
            (0..CPU_SET_CAPACITY)
                // SAFETY: No safety requirements. The index is within the bounds of the set.
                .filter(|index| unsafe { libc::CPU_ISSET(*index, &affinity) })
                .filter_map(|index| OsContextId::try_from(index).ok())
                .collect(),
        )
    }
}

#[allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::indexing_slicing,
    clippy::integer_division,
    reason = "we need not worry in tests"
)]
