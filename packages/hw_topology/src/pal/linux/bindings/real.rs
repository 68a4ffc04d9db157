use std::{io, mem};

use libc::cpu_set_t;

use crate::pal::linux::Bindings;

/// Process ID argument that makes the `sched_*affinity` calls apply to the calling thread.
const CALLING_THREAD: libc::pid_t = 0;

/// Affinity calls of the real operating system.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

// Error paths require OS-level failures that are impractical to trigger in tests.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Bindings for BuildTargetBindings {
    fn set_current_thread_affinity(&self, cpu_set: &cpu_set_t) -> io::Result<()> {
        // SAFETY: The set is a valid reference and the size is the size of its type.
        let result =
            unsafe { libc::sched_setaffinity(CALLING_THREAD, size_of::<cpu_set_t>(), cpu_set) };

        match result {
            0 => Ok(()),
            _ => Err(io::Error::last_os_error()),
        }
    }

    fn current_thread_affinity(&self) -> io::Result<cpu_set_t> {
        // SAFETY: Zero-initialized cpu_set_t is a valid value.
        let mut cpu_set: cpu_set_t = unsafe { mem::zeroed() };

        // SAFETY: The set is a valid exclusive reference and the size is the size of its type.
        let result = unsafe {
            libc::sched_getaffinity(CALLING_THREAD, size_of::<cpu_set_t>(), &raw mut cpu_set)
        };

        match result {
            0 => Ok(cpu_set),
            _ => Err(io::Error::last_os_error()),
        }
    }
}
