//! Parser for the `/proc/cpuinfo` format.

use foldhash::HashMap;

use crate::cpu_record::CpuRecord;

/// Parses `/proc/cpuinfo` style text into one record per distinct processor index, in the order
/// the processors first appear.
///
/// Each `processor : N` line selects the record that subsequent field lines apply to. The
/// recognized fields are `physical id`, `siblings`, `core id` and `cpu cores`; everything else is
/// ignored, as are field lines that precede the first `processor` line and values that are not
/// integers.
///
/// Platforms that do not report `core id` get one core per processor. Platforms that do not
/// report `physical id` get a single package.
pub(crate) fn parse(cpuinfo: &str) -> Vec<CpuRecord> {
    let mut records: Vec<CpuRecord> = Vec::new();

    // Processor index -> position in `records`.
    let mut positions: HashMap<u32, usize> = HashMap::default();
    let mut current: Option<usize> = None;

    for line in cpuinfo.lines() {
        // Example content:
        // processor       : 29
        // vendor_id       : GenuineIntel
        // physical id     : 1
        // siblings        : 32
        // core id         : 7
        // cpu cores       : 16
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let Some(value) = value
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u32>().ok())
        else {
            continue;
        };

        let key = key.trim();

        if key == "processor" {
            let position = *positions.entry(value).or_insert_with(|| {
                let position = records.len();
                records.push(CpuRecord::new(value));
                position
            });

            current = Some(position);
            continue;
        }

        let Some(record) = current.and_then(|position| records.get_mut(position)) else {
            continue;
        };

        match key {
            "physical id" => record.package_id = value,
            "siblings" => record.siblings = value,
            "core id" => record.core_id = value,
            "cpu cores" => record.cpu_cores = value,
            _ => {}
        }
    }

    records
}
