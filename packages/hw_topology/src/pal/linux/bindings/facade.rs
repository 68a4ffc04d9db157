#![cfg_attr(coverage_nightly, coverage(off))]

use std::fmt::Debug;
use std::io;
#[cfg(test)]
use std::sync::Arc;

use libc::cpu_set_t;

#[cfg(test)]
use crate::pal::linux::MockBindings;
use crate::pal::linux::{Bindings, BuildTargetBindings};

/// Real affinity calls in production, a mock that records the requested CPU sets in tests.
#[derive(Clone)]
pub(crate) enum BindingsFacade {
    Target(&'static BuildTargetBindings),

    #[cfg(test)]
    Mock(Arc<MockBindings>),
}

impl BindingsFacade {
    pub(crate) const fn target() -> Self {
        Self::Target(&BuildTargetBindings)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockBindings) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Bindings for BindingsFacade {
    fn set_current_thread_affinity(&self, cpu_set: &cpu_set_t) -> io::Result<()> {
        match self {
            Self::Target(bindings) => bindings.set_current_thread_affinity(cpu_set),
            #[cfg(test)]
            Self::Mock(mock) => mock.set_current_thread_affinity(cpu_set),
        }
    }

    fn current_thread_affinity(&self) -> io::Result<cpu_set_t> {
        match self {
            Self::Target(bindings) => bindings.current_thread_affinity(),
            #[cfg(test)]
            Self::Mock(mock) => mock.current_thread_affinity(),
        }
    }
}

impl Debug for BindingsFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
