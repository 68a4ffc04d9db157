use std::fmt::Debug;

use crate::cpu_record::CpuRecord;
use crate::{OsContextId, Result};

/// The operating system services that topology discovery and thread binding depend on.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Returns a record for every logical processor the operating system reports, including
    /// processors the current process is not allowed to use, with NUMA nodes resolved.
    ///
    /// Fails if the processor information cannot be obtained at all.
    fn cpu_records(&self) -> Result<Vec<CpuRecord>>;

    /// Returns the processors the current process is allowed to use, in ascending order, or
    /// `None` if the process is to be treated as allowed to use every processor.
    fn allowed_os_contexts(&self) -> Option<Vec<OsContextId>>;

    /// Restricts the current thread to execute only on the given hardware context.
    ///
    /// Returns whether this succeeded. Failures are reported via `tracing` and never panic.
    fn bind_current_thread_to(&self, os_context: OsContextId) -> bool;

    /// Returns the hardware contexts the current thread is allowed to execute on, or `None` if
    /// this cannot be determined on this platform.
    fn current_thread_os_contexts(&self) -> Option<Vec<OsContextId>>;
}
