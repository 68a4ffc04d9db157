#![cfg_attr(coverage_nightly, coverage(off))]

use std::fmt::Debug;
use std::io;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::pal::linux::MockNumaLibrary;
use crate::pal::linux::{BuildTargetNumaLibrary, NumaLibrary};
use crate::{NumaNodeId, OsContextId};

/// Enum to hide the real/mock choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum NumaLibraryFacade {
    Target(&'static BuildTargetNumaLibrary),

    #[cfg(test)]
    Mock(Arc<MockNumaLibrary>),
}

impl NumaLibraryFacade {
    pub(crate) const fn target() -> Self {
        Self::Target(&BuildTargetNumaLibrary)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockNumaLibrary) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl NumaLibrary for NumaLibraryFacade {
    fn is_available(&self) -> bool {
        match self {
            Self::Target(library) => library.is_available(),
            #[cfg(test)]
            Self::Mock(mock) => mock.is_available(),
        }
    }

    fn configured_node_count(&self) -> i32 {
        match self {
            Self::Target(library) => library.configured_node_count(),
            #[cfg(test)]
            Self::Mock(mock) => mock.configured_node_count(),
        }
    }

    fn node_of_cpu(&self, os_context: OsContextId) -> io::Result<NumaNodeId> {
        match self {
            Self::Target(library) => library.node_of_cpu(os_context),
            #[cfg(test)]
            Self::Mock(mock) => mock.node_of_cpu(os_context),
        }
    }
}

impl Debug for NumaLibraryFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
