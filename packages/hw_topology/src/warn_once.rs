use std::sync::atomic::{self, AtomicBool};

/// Remembers whether a particular diagnostic has already been emitted, so that a condition that
/// persists for the lifetime of the process is only reported once.
///
/// Owned by whichever instance detects the condition, so independent instances (e.g. in tests)
/// each report once.
#[derive(Debug, Default)]
pub(crate) struct WarnOnce {
    fired: AtomicBool,
}

impl WarnOnce {
    pub(crate) const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Calls `emit` if and only if this is the first call on this instance.
    ///
    /// When called concurrently, exactly one caller emits.
    pub(crate) fn call(&self, emit: impl FnOnce()) {
        if !self.fired.swap(true, atomic::Ordering::Relaxed) {
            emit();
        }
    }

    #[cfg(test)]
    pub(crate) fn has_fired(&self) -> bool {
        self.fired.load(atomic::Ordering::Relaxed)
    }
}
