#[cfg(feature = "libnuma")]
use std::ffi::{CStr, c_void};
use std::fmt::Debug;
use std::io;
#[cfg(feature = "libnuma")]
use std::mem;
#[cfg(feature = "libnuma")]
use std::sync::OnceLock;

use libc::c_int;
#[cfg(feature = "libnuma")]
use tracing::debug;

use crate::pal::linux::NumaLibrary;
use crate::{NumaNodeId, OsContextId};

/// The shared object loaded to obtain NUMA information.
#[cfg(feature = "libnuma")]
pub(crate) const LIBNUMA_SONAME: &CStr = c"libnuma.so.1";

type NumaAvailableFn = unsafe extern "C" fn() -> c_int;
type NumaNumConfiguredNodesFn = unsafe extern "C" fn() -> c_int;
type NumaNodeOfCpuFn = unsafe extern "C" fn(c_int) -> c_int;

/// Entry points resolved from a successfully loaded `libnuma`.
///
/// The library handle is never closed, so the function pointers remain valid for the lifetime
/// of the process.
#[derive(Debug)]
#[cfg_attr(
    not(feature = "libnuma"),
    expect(dead_code, reason = "nothing is ever loaded without the libnuma feature")
)]
struct LoadedLibNuma {
    numa_available: NumaAvailableFn,
    numa_num_configured_nodes: NumaNumConfiguredNodesFn,
    numa_node_of_cpu: NumaNodeOfCpuFn,
}

/// Loaded on first use, at most once per process.
#[cfg(feature = "libnuma")]
static LIBNUMA: OnceLock<Option<LoadedLibNuma>> = OnceLock::new();

#[cfg(feature = "libnuma")]
fn libnuma() -> Option<&'static LoadedLibNuma> {
    LIBNUMA.get_or_init(load_libnuma).as_ref()
}

#[cfg(not(feature = "libnuma"))]
fn libnuma() -> Option<&'static LoadedLibNuma> {
    None
}

#[cfg(feature = "libnuma")]
#[cfg_attr(coverage_nightly, coverage(off))] // Outcome depends on what the system has installed.
fn load_libnuma() -> Option<LoadedLibNuma> {
    // SAFETY: The name is a valid NUL-terminated string.
    let handle = unsafe { libc::dlopen(LIBNUMA_SONAME.as_ptr(), libc::RTLD_LAZY) };

    if handle.is_null() {
        debug!(soname = ?LIBNUMA_SONAME, "libnuma could not be loaded");
        return None;
    }

    // SAFETY: The handle is live and the type matches `int numa_available(void)`.
    let numa_available = unsafe { symbol::<NumaAvailableFn>(handle, c"numa_available") };
    // SAFETY: The handle is live and the type matches `int numa_num_configured_nodes(void)`.
    let numa_num_configured_nodes =
        unsafe { symbol::<NumaNumConfiguredNodesFn>(handle, c"numa_num_configured_nodes") };
    // SAFETY: The handle is live and the type matches `int numa_node_of_cpu(int cpu)`.
    let numa_node_of_cpu = unsafe { symbol::<NumaNodeOfCpuFn>(handle, c"numa_node_of_cpu") };

    let (Some(numa_available), Some(numa_num_configured_nodes), Some(numa_node_of_cpu)) =
        (numa_available, numa_num_configured_nodes, numa_node_of_cpu)
    else {
        debug!(soname = ?LIBNUMA_SONAME, "libnuma is missing expected functions");
        return None;
    };

    debug!(soname = ?LIBNUMA_SONAME, "libnuma loaded");

    Some(LoadedLibNuma {
        numa_available,
        numa_num_configured_nodes,
        numa_node_of_cpu,
    })
}

/// Looks up a function exported by a loaded shared object.
///
/// # Safety
///
/// `handle` must be a live handle returned by `dlopen()` and `F` must be an `extern "C"` function
/// pointer type that matches the C declaration of the symbol.
#[cfg(feature = "libnuma")]
unsafe fn symbol<F: Copy>(handle: *mut c_void, name: &CStr) -> Option<F> {
    // SAFETY: Forwarding the caller's guarantee about the handle; the name is NUL-terminated.
    let address = unsafe { libc::dlsym(handle, name.as_ptr()) };

    if address.is_null() {
        return None;
    }

    // SAFETY: Forwarding the caller's guarantee that F is a matching function pointer type, which
    // has the same size as a data pointer on every platform that has dlsym().
    Some(unsafe { mem::transmute_copy::<*mut c_void, F>(&address) })
}

/// `libnuma` of the real operating system, loaded dynamically if present.
///
/// You would only use a different NUMA library in PAL unit tests that need to control what the
/// library reports.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetNumaLibrary;

#[cfg_attr(coverage_nightly, coverage(off))] // Outcome depends on what the system has installed.
impl NumaLibrary for BuildTargetNumaLibrary {
    fn is_available(&self) -> bool {
        // SAFETY: No safety requirements.
        libnuma().is_some_and(|lib| unsafe { (lib.numa_available)() } >= 0)
    }

    fn configured_node_count(&self) -> i32 {
        // SAFETY: No safety requirements.
        libnuma().map_or(0, |lib| unsafe { (lib.numa_num_configured_nodes)() })
    }

    fn node_of_cpu(&self, os_context: OsContextId) -> io::Result<NumaNodeId> {
        let lib = libnuma()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "libnuma is not loaded"))?;

        let cpu = c_int::try_from(os_context)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

        // SAFETY: No safety requirements; invalid processors are reported via the return value.
        let node = unsafe { (lib.numa_node_of_cpu)(cpu) };

        if node < 0 {
            return Err(io::Error::last_os_error());
        }

        NumaNodeId::try_from(node)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
    }
}
