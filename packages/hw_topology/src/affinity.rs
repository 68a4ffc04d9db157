use std::sync::OnceLock;

use crate::OsContextId;
use crate::pal::{Platform, PlatformFacade};

static CURRENT_BINDER: OnceLock<AffinityBinder> = OnceLock::new();

/// Restricts threads to execute on specific hardware contexts.
///
/// Hardware contexts are identified by the operating system identifiers found in
/// [`ThreadTopology::os_context()`][crate::ThreadTopology::os_context].
///
/// Binding is best-effort. A failure (for example, a context the process is not allowed to use
/// or a platform without thread affinity support) is reported as a `false` return value and a
/// warning emitted via `tracing`. It never panics.
///
/// # Example
///
/// ```
/// use hw_topology::{AffinityBinder, hardware_topology};
///
/// let topology = hardware_topology();
/// let binder = AffinityBinder::current();
///
/// if let Some(thread) = topology.threads().last() {
///     if binder.bind_current_thread(thread.os_context()) {
///         println!("now running only on OS context {}", thread.os_context());
///     }
/// }
/// ```
#[derive(Debug)]
pub struct AffinityBinder {
    platform: PlatformFacade,
}

impl AffinityBinder {
    /// The process-wide binder.
    #[must_use]
    pub fn current() -> &'static Self {
        CURRENT_BINDER.get_or_init(Self::new)
    }

    /// Creates a binder for the current platform. It behaves the same as the process-wide binder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_platform(PlatformFacade::target())
    }

    pub(crate) fn with_platform(platform: PlatformFacade) -> Self {
        Self { platform }
    }

    /// Restricts the calling thread to execute only on the given hardware context.
    ///
    /// Returns whether the operating system accepted the restriction. On failure, the affinity
    /// of the thread is unchanged.
    #[must_use]
    pub fn bind_current_thread(&self, os_context: OsContextId) -> bool {
        self.platform.bind_current_thread_to(os_context)
    }

    /// The hardware contexts the calling thread is currently allowed to execute on, in ascending
    /// order.
    ///
    /// Returns `None` if the platform cannot report thread affinity.
    #[must_use]
    pub fn current_thread_os_contexts(&self) -> Option<Vec<OsContextId>> {
        self.platform.current_thread_os_contexts()
    }
}

impl Default for AffinityBinder {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarding, no observable difference to mutate.
    fn default() -> Self {
        Self::new()
    }
}

/// Restricts the calling thread to execute only on the given hardware context, using the
/// process-wide binder.
///
/// Shorthand for `AffinityBinder::current().bind_current_thread(os_context)`.
#[must_use]
pub fn bind_current_thread(os_context: OsContextId) -> bool {
    AffinityBinder::current().bind_current_thread(os_context)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::pal::MockPlatform;

    assert_impl_all!(AffinityBinder: Send, Sync);

    #[test]
    fn bind_forwards_to_platform() {
        let mut platform = MockPlatform::new();
        platform
            .expect_bind_current_thread_to()
            .withf(|os_context| *os_context == 7)
            .times(1)
            .return_const(true);
        platform
            .expect_bind_current_thread_to()
            .withf(|os_context| *os_context == 8)
            .times(1)
            .return_const(false);

        let binder = AffinityBinder::with_platform(PlatformFacade::from_mock(platform));

        assert!(binder.bind_current_thread(7));
        assert!(!binder.bind_current_thread(8));
    }

    #[test]
    fn current_thread_os_contexts_forwards_to_platform() {
        let mut platform = MockPlatform::new();
        platform
            .expect_current_thread_os_contexts()
            .times(1)
            .return_const(Some(vec![2, 3]));

        let binder = AffinityBinder::with_platform(PlatformFacade::from_mock(platform));

        assert_eq!(binder.current_thread_os_contexts(), Some(vec![2, 3]));
    }

    #[test]
    fn fallback_platform_never_binds() {
        let binder = AffinityBinder::with_platform(PlatformFacade::fallback());

        assert!(!binder.bind_current_thread(0));
        assert!(!binder.bind_current_thread(1));
        assert_eq!(binder.current_thread_os_contexts(), None);
    }

    #[test]
    #[cfg(target_os = "linux")]
    #[cfg_attr(miri, ignore)] // Miri cannot call platform APIs.
    fn bind_to_allowed_context() {
        // Run on a separate thread so the test runner thread keeps its affinity.
        thread::spawn(|| {
            let binder = AffinityBinder::current();

            let allowed = binder.current_thread_os_contexts().unwrap();
            let target = *allowed.last().unwrap();

            assert!(bind_current_thread(target));
            assert_eq!(binder.current_thread_os_contexts(), Some(vec![target]));
        })
        .join()
        .unwrap();
    }

    #[test]
    #[cfg(target_os = "linux")]
    #[cfg_attr(miri, ignore)] // Miri cannot call platform APIs.
    fn bind_to_nonexistent_context_fails() {
        thread::spawn(|| {
            let binder = AffinityBinder::new();
            let before = binder.current_thread_os_contexts();

            assert!(!binder.bind_current_thread(OsContextId::MAX));
            assert_eq!(binder.current_thread_os_contexts(), before);
        })
        .join()
        .unwrap();
    }
}
