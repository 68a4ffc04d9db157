use std::fmt::Debug;
use std::io;

use libc::cpu_set_t;

/// The scheduler affinity calls that thread binding is made of, always applied to the calling
/// thread.
///
/// Kept separate from the platform logic so tests can observe the exact CPU sets requested
/// without changing the affinity of the test thread.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    /// Restricts the calling thread to the processors in `cpu_set` (`sched_setaffinity`).
    fn set_current_thread_affinity(&self, cpu_set: &cpu_set_t) -> io::Result<()>;

    /// The processors the calling thread may execute on (`sched_getaffinity`).
    fn current_thread_affinity(&self) -> io::Result<cpu_set_t>;
}
