use std::sync::OnceLock;

use tracing::warn;

use crate::cpu_record::CpuRecord;
use crate::pal::linux::{NumaLibrary, NumaLibraryFacade};
use crate::{Error, NumaNodeId, Result};

/// Where NUMA node information comes from, decided once per resolver.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NumaSource {
    Library,

    /// No NUMA information, so each package is assumed to be its own NUMA node.
    PackageApproximation,
}

/// Determines the NUMA node of each processor.
///
/// The first resolution decides whether the NUMA library can be used. If it cannot, a warning
/// is emitted (once) and every processor is assigned to a NUMA node numbered after its package.
#[derive(Debug)]
pub(crate) struct NumaResolver {
    library: NumaLibraryFacade,
    source: OnceLock<NumaSource>,
}

impl NumaResolver {
    pub(crate) const fn new(library: NumaLibraryFacade) -> Self {
        Self {
            library,
            source: OnceLock::new(),
        }
    }

    /// Returns the NUMA node of the processor described by the record.
    ///
    /// Fails only if the NUMA library is in use but cannot place a processor the operating
    /// system reported, which means the NUMA state is inconsistent.
    pub(crate) fn resolve(&self, record: &CpuRecord) -> Result<NumaNodeId> {
        match self.source() {
            NumaSource::PackageApproximation => Ok(record.package_id),
            NumaSource::Library => self
                .library
                .node_of_cpu(record.os_context)
                .map_err(|source| Error::NumaNodeLookup {
                    os_context: record.os_context,
                    source,
                }),
        }
    }

    fn source(&self) -> NumaSource {
        // Concurrent first callers block here until one of them has decided.
        *self.source.get_or_init(|| {
            if self.library.is_available() && self.library.configured_node_count() > 0 {
                NumaSource::Library
            } else {
                warn!(
                    "NUMA information is not available at runtime, assuming NUMA topology matches package topology"
                );
                NumaSource::PackageApproximation
            }
        })
    }
}

#[allow(clippy::arithmetic_side_effects, reason = "we need not worry in tests")]
#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io;
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::pal::linux::MockNumaLibrary;

    fn record(os_context: u32, package_id: u32) -> CpuRecord {
        CpuRecord {
            package_id,
            ..CpuRecord::new(os_context)
        }
    }

    #[test]
    fn library_nodes_are_used_when_available() {
        let mut library = MockNumaLibrary::new();
        library.expect_is_available().times(1).return_const(true);
        library.expect_configured_node_count().times(1).return_const(2);
        library
            .expect_node_of_cpu()
            .times(2)
            .returning(|os_context| Ok(os_context % 2));

        let resolver = NumaResolver::new(NumaLibraryFacade::from_mock(library));

        assert_eq!(resolver.resolve(&record(4, 0)).unwrap(), 0);
        assert_eq!(resolver.resolve(&record(5, 0)).unwrap(), 1);
    }

    #[test]
    fn unavailable_library_falls_back_to_package() {
        let mut library = MockNumaLibrary::new();
        library.expect_is_available().times(1).return_const(false);
        library.expect_configured_node_count().never();
        library.expect_node_of_cpu().never();

        let resolver = NumaResolver::new(NumaLibraryFacade::from_mock(library));

        assert_eq!(resolver.resolve(&record(0, 3)).unwrap(), 3);
        assert_eq!(resolver.resolve(&record(1, 7)).unwrap(), 7);
        assert_eq!(resolver.source(), NumaSource::PackageApproximation);
    }

    #[test]
    fn zero_configured_nodes_falls_back_to_package() {
        let mut library = MockNumaLibrary::new();
        library.expect_is_available().times(1).return_const(true);
        library.expect_configured_node_count().times(1).return_const(0);
        library.expect_node_of_cpu().never();

        let resolver = NumaResolver::new(NumaLibraryFacade::from_mock(library));

        assert_eq!(resolver.resolve(&record(2, 1)).unwrap(), 1);
    }

    #[test]
    fn failed_lookup_is_error() {
        let mut library = MockNumaLibrary::new();
        library.expect_is_available().return_const(true);
        library.expect_configured_node_count().return_const(1);
        library
            .expect_node_of_cpu()
            .returning(|_| Err(io::Error::from(io::ErrorKind::InvalidInput)));

        let resolver = NumaResolver::new(NumaLibraryFacade::from_mock(library));

        let error = resolver.resolve(&record(9, 0)).unwrap_err();
        assert!(matches!(error, Error::NumaNodeLookup { os_context: 9, .. }));
    }

    #[test]
    fn concurrent_first_calls_decide_once() {
        let mut library = MockNumaLibrary::new();
        library.expect_is_available().times(1).return_const(false);

        let resolver = Arc::new(NumaResolver::new(NumaLibraryFacade::from_mock(library)));

        let threads = (0..8)
            .map(|package_id| {
                let resolver = Arc::clone(&resolver);
                thread::spawn(move || resolver.resolve(&record(package_id, package_id)).unwrap())
            })
            .collect::<Vec<_>>();

        for (package_id, thread) in threads.into_iter().enumerate() {
            assert_eq!(thread.join().unwrap() as usize, package_id);
        }
    }
}
