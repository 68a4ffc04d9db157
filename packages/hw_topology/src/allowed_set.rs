//! Determines which processors the current process is allowed to use.
//!
//! On Linux, mechanisms like cgroups and `taskset` may limit the processors a process can run on.
//! Binding a thread to a forbidden processor fails, so such processors are removed from the
//! topology entirely.

use tracing::warn;

use crate::cpu_record::CpuRecord;
use crate::{OsContextId, Result};

const CPUS_ALLOWED_LIST_PREFIX: &str = "Cpus_allowed_list:";

/// Extracts the allowed processors from `/proc/self/status` style text.
///
/// Returns `None` if every processor should be treated as allowed: when the line is absent, when
/// the list is empty or when it cannot be parsed.
pub(crate) fn parse_status(status: &str) -> Option<Vec<OsContextId>> {
    // Example content:
    // Speculation_Store_Bypass:       thread vulnerable
    // Cpus_allowed:   ffffffff
    // Cpus_allowed_list:      0-31
    // Mems_allowed:   1
    // Mems_allowed_list:      0
    let list = status
        .lines()
        .find_map(|line| line.strip_prefix(CPUS_ALLOWED_LIST_PREFIX))?;

    match parse_list(list) {
        Ok(allowed) if allowed.is_empty() => None,
        Ok(allowed) => Some(allowed),
        Err(error) => {
            warn!(%error, "ignoring unparseable Cpus_allowed_list, assuming all processors are allowed");
            None
        }
    }
}

fn parse_list(list: &str) -> Result<Vec<OsContextId>> {
    Ok(cpulist::parse(list.trim())?)
}

/// Marks each record valid if and only if its processor is in the allowed set.
///
/// `None` allows everything. The allowed set is expected in ascending order, as returned by
/// [`parse_status()`].
pub(crate) fn mark_valid(records: &mut [CpuRecord], allowed: Option<&[OsContextId]>) {
    for record in records {
        record.is_valid =
            allowed.is_none_or(|allowed| allowed.binary_search(&record.os_context).is_ok());
    }
}
