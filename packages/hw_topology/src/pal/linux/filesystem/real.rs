use std::fmt::Debug;
use std::{fs, io};

use crate::pal::linux::Filesystem;

pub(crate) const CPUINFO_PATH: &str = "/proc/cpuinfo";

const PROC_SELF_STATUS_PATH: &str = "/proc/self/status";

/// The virtual filesystem for the real operating system that the build is targeting.
///
/// You would only use different filesystems in PAL unit tests that need to use a mock filesystem.
/// Even then, whenever possible, unit tests should use the real filesystem for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetFilesystem;

impl Filesystem for BuildTargetFilesystem {
    fn get_cpuinfo_contents(&self) -> io::Result<String> {
        fs::read(CPUINFO_PATH).map(into_text)
    }

    fn get_proc_self_status_contents(&self) -> Option<String> {
        fs::read(PROC_SELF_STATUS_PATH).ok().map(into_text)
    }
}

// Procfs values such as the process name are raw bytes, truncated by the kernel without regard
// for UTF-8 sequence boundaries.
fn into_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => String::from_utf8_lossy(error.as_bytes()).into_owned(),
    }
}

#[allow(clippy::indexing_slicing, reason = "we need not worry in tests")]
#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{allowed_set, cpuinfo};

    #[test]
    fn real_files_are_readable() {
        let filesystem = BuildTargetFilesystem;

        let cpuinfo = filesystem.get_cpuinfo_contents().unwrap();
        assert!(cpuinfo.contains("processor"));

        let status = filesystem.get_proc_self_status_contents().unwrap();
        assert!(status.contains("Cpus_allowed_list:"));
    }

    #[test]
    fn status_with_truncated_process_name_keeps_allowed_list() {
        // "abcd" followed by the first two bytes of a three-byte character.
        let mut status = b"Name:\tabcd\xe3\x83\nUmask:\t0022\n".to_vec();
        status.extend_from_slice(b"Cpus_allowed:\t1\nCpus_allowed_list:\t0\n");

        let text = into_text(status);

        assert!(text.starts_with("Name:\tabcd\u{fffd}"));
        assert_eq!(allowed_set::parse_status(&text), Some(vec![0]));
    }

    #[test]
    fn cpuinfo_with_invalid_bytes_is_still_parsed() {
        let contents = b"processor\t: 0\nmodel name\t: \xff\xfe\ncore id\t\t: 3\n\n".to_vec();

        let records = cpuinfo::parse(&into_text(contents));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].core_id, 3);
    }

    #[test]
    fn valid_text_is_unchanged() {
        assert_eq!(into_text(b"Cpus_allowed_list:\t0-3\n".to_vec()), "Cpus_allowed_list:\t0-3\n");
    }
}
