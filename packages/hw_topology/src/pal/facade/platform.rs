#![cfg_attr(coverage_nightly, coverage(off))]

use std::fmt::Debug;
#[cfg(test)]
use std::sync::Arc;

use crate::cpu_record::CpuRecord;
#[cfg(test)]
use crate::pal::MockPlatform;
#[cfg(test)]
use crate::pal::fallback::BuildTargetPlatform as FallbackPlatform;
use crate::pal::{BUILD_TARGET_PLATFORM, BuildTargetPlatform, Platform};
use crate::{OsContextId, Result};

/// Enum to hide the real/fallback/mock choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Target(&'static BuildTargetPlatform),

    #[cfg(test)]
    Fallback(Arc<FallbackPlatform>),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

impl PlatformFacade {
    pub(crate) fn target() -> Self {
        Self::Target(&BUILD_TARGET_PLATFORM)
    }

    #[cfg(test)]
    pub(crate) fn fallback() -> Self {
        Self::Fallback(Arc::new(FallbackPlatform::new()))
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Platform for PlatformFacade {
    fn cpu_records(&self) -> Result<Vec<CpuRecord>> {
        match self {
            Self::Target(p) => p.cpu_records(),
            #[cfg(test)]
            Self::Fallback(p) => p.cpu_records(),
            #[cfg(test)]
            Self::Mock(p) => p.cpu_records(),
        }
    }

    fn allowed_os_contexts(&self) -> Option<Vec<OsContextId>> {
        match self {
            Self::Target(p) => p.allowed_os_contexts(),
            #[cfg(test)]
            Self::Fallback(p) => p.allowed_os_contexts(),
            #[cfg(test)]
            Self::Mock(p) => p.allowed_os_contexts(),
        }
    }

    fn bind_current_thread_to(&self, os_context: OsContextId) -> bool {
        match self {
            Self::Target(p) => p.bind_current_thread_to(os_context),
            #[cfg(test)]
            Self::Fallback(p) => p.bind_current_thread_to(os_context),
            #[cfg(test)]
            Self::Mock(p) => p.bind_current_thread_to(os_context),
        }
    }

    fn current_thread_os_contexts(&self) -> Option<Vec<OsContextId>> {
        match self {
            Self::Target(p) => p.current_thread_os_contexts(),
            #[cfg(test)]
            Self::Fallback(p) => p.current_thread_os_contexts(),
            #[cfg(test)]
            Self::Mock(p) => p.current_thread_os_contexts(),
        }
    }
}

impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Fallback(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
