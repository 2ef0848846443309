use std::ffi::CStr;

use super::snapshot::{CpuTicks, SwapSnapshot, VmCounters};

/// Kernel and hardware queries the collector needs from each OS.
///
/// Every probe returns `None` when the underlying call fails; callers decide
/// whether that is fatal.
pub trait PlatformProbe {
    fn vm_counters() -> Option<VmCounters>;
    fn total_memory() -> Option<u64>;
    fn swap_usage() -> Option<SwapSnapshot>;
    fn pressure_level() -> Option<i32>;
    fn cpu_ticks() -> Option<CpuTicks>;
    fn load_average() -> Option<[f64; 3]>;
    fn gpu_utilization() -> Option<f64>;
    fn thermal_level() -> Option<u64>;
    fn hardware_model() -> Option<String>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use unsupported as platform_impl;

pub fn vm_counters() -> Option<VmCounters> {
    platform_impl::Platform::vm_counters()
}

pub fn total_memory() -> Option<u64> {
    platform_impl::Platform::total_memory()
}

pub fn swap_usage() -> Option<SwapSnapshot> {
    platform_impl::Platform::swap_usage()
}

pub fn pressure_level() -> Option<i32> {
    platform_impl::Platform::pressure_level()
}

pub fn cpu_ticks() -> Option<CpuTicks> {
    platform_impl::Platform::cpu_ticks()
}

pub fn load_average() -> Option<[f64; 3]> {
    platform_impl::Platform::load_average()
}

pub fn gpu_utilization() -> Option<f64> {
    platform_impl::Platform::gpu_utilization()
}

pub fn thermal_level() -> Option<u64> {
    platform_impl::Platform::thermal_level()
}

pub fn hardware_model() -> Option<String> {
    platform_impl::Platform::hardware_model()
}

/// `getloadavg` with the "exactly three samples" rule applied.
#[cfg(unix)]
fn getloadavg3() -> Option<[f64; 3]> {
    let mut values = [0.0_f64; 3];
    // SAFETY: `getloadavg` writes at most 3 doubles into a 3-element buffer.
    let n = unsafe { libc::getloadavg(values.as_mut_ptr(), 3) };
    (n == 3).then_some(values)
}

/// Utilization keys of an accelerator's performance statistics, in priority
/// order.
const GPU_DIRECT_KEYS: [&CStr; 2] = [c"Device Utilization %", c"GPU Activity(%)"];
const GPU_ALL_TIME_KEY: &CStr = c"allGPUTime";
const GPU_WAIT_TIME_KEY: &CStr = c"hardwareWaitTime";

/// Picks a utilization percentage out of one accelerator's statistics.
/// A direct key wins; otherwise the busy share of `allGPUTime` is used.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn gpu_utilization_from(lookup: impl Fn(&CStr) -> Option<f64>) -> Option<f64> {
    let pct = match GPU_DIRECT_KEYS.iter().find_map(|key| lookup(key)) {
        Some(pct) => pct,
        None => {
            let all_time = lookup(GPU_ALL_TIME_KEY)?;
            let wait_time = lookup(GPU_WAIT_TIME_KEY)?;
            if all_time.is_nan() || all_time <= 0.0 {
                return None;
            }
            (all_time - wait_time) / all_time * 100.0
        }
    };
    pct.is_finite().then(|| pct.clamp(0.0, 100.0))
}
