use super::PlatformProbe;
use crate::system::snapshot::{CpuTicks, SwapSnapshot, VmCounters};

/// Hosts without a counter backend: memory is unavailable, so the run
/// reports `ERR`.
pub struct Platform;

impl PlatformProbe for Platform {
    fn vm_counters() -> Option<VmCounters> {
        None
    }

    fn total_memory() -> Option<u64> {
        None
    }

    fn swap_usage() -> Option<SwapSnapshot> {
        None
    }

    fn pressure_level() -> Option<i32> {
        None
    }

    fn cpu_ticks() -> Option<CpuTicks> {
        None
    }

    #[cfg(unix)]
    fn load_average() -> Option<[f64; 3]> {
        super::getloadavg3()
    }

    #[cfg(not(unix))]
    fn load_average() -> Option<[f64; 3]> {
        None
    }

    fn gpu_utilization() -> Option<f64> {
        None
    }

    fn thermal_level() -> Option<u64> {
        None
    }

    fn hardware_model() -> Option<String> {
        None
    }
}
