use std::collections::HashMap;
use std::path::Path;

use super::PlatformProbe;
use crate::system::snapshot::{CpuTicks, SwapSnapshot, VmCounters};

pub struct Platform;

/// `/proc/meminfo` reports kB, so counters are expressed in 1 KiB "pages".
const MEMINFO_UNIT: u64 = 1024;

impl PlatformProbe for Platform {
    fn vm_counters() -> Option<VmCounters> {
        let info = read_meminfo()?;
        let field = |key: &str| info.get(key).copied().unwrap_or(0);
        Some(VmCounters {
            page_size: MEMINFO_UNIT,
            free: *info.get("MemFree")?,
            active: *info.get("Active")?,
            inactive: *info.get("Inactive")?,
            // Closest analogues of wired and compressor pages.
            wired: field("Unevictable"),
            compressed: field("Zswap"),
            purgeable: 0,
            speculative: 0,
            internal: field("AnonPages"),
            external: field("Cached"),
        })
    }

    fn total_memory() -> Option<u64> {
        read_meminfo()?
            .get("MemTotal")
            .map(|kb| kb * MEMINFO_UNIT)
    }

    fn swap_usage() -> Option<SwapSnapshot> {
        let info = read_meminfo()?;
        let total = *info.get("SwapTotal")? * MEMINFO_UNIT;
        let free = *info.get("SwapFree")? * MEMINFO_UNIT;
        Some(SwapSnapshot {
            used: total.saturating_sub(free),
            total,
        })
    }

    fn pressure_level() -> Option<i32> {
        // No kernel pressure-level code on Linux; callers default to normal.
        None
    }

    fn cpu_ticks() -> Option<CpuTicks> {
        let contents = std::fs::read_to_string("/proc/stat").ok()?;
        parse_proc_stat_cpu(&contents)
    }

    fn load_average() -> Option<[f64; 3]> {
        super::getloadavg3()
    }

    fn gpu_utilization() -> Option<f64> {
        let mut cards: Vec<_> = std::fs::read_dir("/sys/class/drm")
            .ok()?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("card") && !n.contains('-'))
            })
            .collect();
        cards.sort();
        cards.iter().find_map(|card| {
            let raw = std::fs::read_to_string(card.join("device/gpu_busy_percent")).ok()?;
            let pct = raw.trim().parse::<f64>().ok()?;
            Some(pct.clamp(0.0, 100.0))
        })
    }

    fn thermal_level() -> Option<u64> {
        None
    }

    fn hardware_model() -> Option<String> {
        read_trimmed(Path::new("/sys/devices/virtual/dmi/id/product_name"))
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn read_meminfo() -> Option<HashMap<String, u64>> {
    let contents = std::fs::read_to_string("/proc/meminfo").ok()?;
    Some(parse_meminfo(&contents))
}

/// Parses `Key:   1234 kB` lines; values stay in kB.
fn parse_meminfo(contents: &str) -> HashMap<String, u64> {
    contents
        .lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let value = rest.split_whitespace().next()?.parse().ok()?;
            Some((key.trim().to_string(), value))
        })
        .collect()
}

/// Reads the aggregate `cpu` line into the four mach-style states: iowait
/// counts as idle; irq, softirq and steal count as system. Guest time is
/// already included in user and nice.
fn parse_proc_stat_cpu(contents: &str) -> Option<CpuTicks> {
    let line = contents
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|f| f.parse().ok())
        .collect::<Option<_>>()?;
    if fields.len() < 4 {
        return None;
    }
    let extra = |i: usize| fields.get(i).copied().unwrap_or(0);
    Some(CpuTicks {
        user: fields[0],
        nice: fields[1],
        system: fields[2] + extra(5) + extra(6) + extra(7),
        idle: fields[3] + extra(4),
    })
}
