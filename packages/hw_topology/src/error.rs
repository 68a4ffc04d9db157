use std::io;

use thiserror::Error;

use crate::OsContextId;

/// Errors that make it impossible to form a hardware topology.
///
/// None of these are recoverable in a meaningful way: without a topology the caller has nothing
/// to schedule work on. They exist as values so that callers who want to report the failure in
/// their own way can do so via [`TopologyCache::try_get()`][crate::TopologyCache::try_get].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system source describing the logical processors could not be read.
    #[error("failed to read processor information from {path}: {source}")]
    ProcessorInfoUnavailable {
        /// Path of the virtual file that could not be read.
        path: &'static str,

        /// The error reported by the operating system.
        #[source]
        source: io::Error,
    },

    /// The NUMA library reported that it is available but could not tell which node a known
    /// processor belongs to. The NUMA state is inconsistent and cannot be approximated.
    #[error("failed to find NUMA node of processor {os_context}: {source}")]
    NumaNodeLookup {
        /// The processor whose NUMA node could not be determined.
        os_context: OsContextId,

        /// The error reported by the NUMA library.
        #[source]
        source: io::Error,
    },

    /// The list of processors the process is allowed to use is not a valid cpulist.
    #[error("invalid allowed processor list: {source}")]
    InvalidCpuList {
        /// The parse error reported by the cpulist parser.
        #[from]
        source: cpulist::Error,
    },
}

/// A specialized `Result` type for topology operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::error::Error as _;
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn processor_info_error_includes_os_error_text() {
        let error = Error::ProcessorInfoUnavailable {
            path: "/proc/cpuinfo",
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };

        let message = error.to_string();
        assert!(message.contains("/proc/cpuinfo"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn numa_lookup_error_names_processor() {
        let error = Error::NumaNodeLookup {
            os_context: 17,
            source: io::Error::other("invalid argument"),
        };

        assert!(error.to_string().contains("processor 17"));
    }

    #[test]
    fn invalid_cpu_list_keeps_parse_error_as_source() {
        let parse_error = cpulist::parse("0-x").unwrap_err();
        let error = Error::from(parse_error);

        assert!(matches!(error, Error::InvalidCpuList { .. }));
        assert!(error.source().is_some());
        assert!(error.to_string().contains("invalid allowed processor list"));
    }
}
