use std::sync::{Mutex, OnceLock};

use crate::pal::{Platform, PlatformFacade};
use crate::{HardwareTopology, Result, builder};

const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - a previous topology build panicked while holding it";

/// The process-wide cache, initialized on first access.
static CURRENT_CACHE: OnceLock<TopologyCache> = OnceLock::new();

/// Discovers the hardware topology on first use and hands out copies of it from then on.
///
/// The first call to [`get()`][Self::get] or [`try_get()`][Self::try_get] reads the processor
/// information from the operating system and builds the topology while holding a lock. Concurrent
/// callers wait for that build to finish and then receive the same result. No caller ever
/// observes a partially built topology.
///
/// Most code uses the process-wide instance via [`TopologyCache::current()`] or the
/// [`hardware_topology()`] shorthand. Each instance created with [`TopologyCache::new()`]
/// performs its own discovery.
///
/// # Example
///
/// ```
/// use hw_topology::TopologyCache;
///
/// let topology = TopologyCache::current().get();
///
/// println!("{} usable hardware threads", topology.machine().max_threads());
/// ```
#[derive(Debug)]
pub struct TopologyCache {
    platform: PlatformFacade,
    topology: Mutex<Option<HardwareTopology>>,
}

impl TopologyCache {
    /// The process-wide topology cache.
    #[must_use]
    pub fn current() -> &'static Self {
        CURRENT_CACHE.get_or_init(Self::new)
    }

    /// Creates a cache that performs its own topology discovery on first use, independent of
    /// the process-wide instance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_platform(PlatformFacade::target())
    }

    pub(crate) fn with_platform(platform: PlatformFacade) -> Self {
        Self {
            platform,
            topology: Mutex::new(None),
        }
    }

    /// Returns the hardware topology, discovering it if this is the first call.
    ///
    /// # Panics
    ///
    /// Panics if the topology cannot be discovered because the operating system does not provide
    /// the required processor information. Use [`try_get()`][Self::try_get] to handle this
    /// instead.
    #[must_use]
    pub fn get(&self) -> HardwareTopology {
        match self.try_get() {
            Ok(topology) => topology,
            Err(error) => panic!("fatal system error: {error}"),
        }
    }

    /// Returns the hardware topology, discovering it if this is the first successful call.
    ///
    /// A failed discovery is not cached. The next call tries again.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system does not provide the processor information
    /// required to form a topology.
    pub fn try_get(&self) -> Result<HardwareTopology> {
        let mut topology = self.topology.lock().expect(ERR_POISONED_LOCK);

        if let Some(topology) = topology.as_ref() {
            return Ok(topology.clone());
        }

        let records = self.platform.cpu_records()?;
        let allowed = self.platform.allowed_os_contexts();

        let built = builder::build(records, allowed.as_deref());
        *topology = Some(built.clone());

        Ok(built)
    }
}

impl Default for TopologyCache {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarding, no observable difference to mutate.
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the hardware topology of the current process from the process-wide cache.
///
/// Shorthand for `TopologyCache::current().get()`.
///
/// # Panics
///
/// Panics if the topology cannot be discovered. See [`TopologyCache::get()`].
#[must_use]
pub fn hardware_topology() -> HardwareTopology {
    TopologyCache::current().get()
}

#[allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "we need not worry in tests"
)]
