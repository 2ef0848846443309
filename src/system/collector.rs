use std::time::{SystemTime, UNIX_EPOCH};

use sysinfo::{CpuRefreshKind, RefreshKind, System};
use tracing::{debug, debug_span, warn};

use super::platform;
use super::snapshot::{
    CpuSnapshot, LoadAverage, MemoryPressure, MemorySnapshot, SwapSnapshot, SystemIdentity,
    SystemSnapshot, ThermalState, Uptime,
};

const DEFAULT_MODEL: &str = "Mac";
const DEFAULT_CHIP: &str = "Apple Silicon";

/// Point-in-time reader for every metric the menu shows.
///
/// Each `read_*` call is independent. Failures come back as `None` (or a
/// safe default) and are logged at debug level; nothing here panics.
pub struct Collector {
    sys: System,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        // Only the CPU list is needed, for brand and logical core count.
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()),
        );
        Collector { sys }
    }

    /// Collects a full snapshot. `None` only when memory cannot be read,
    /// which is the one fatal condition.
    pub fn snapshot(&self) -> Option<SystemSnapshot> {
        let _span = debug_span!("collector.snapshot").entered();

        let memory = self.read_memory()?;
        let identity = self.read_identity(memory.total);

        Some(SystemSnapshot {
            swap: self.read_swap(),
            pressure: self.read_memory_pressure(),
            cpu: self.read_cpu(),
            load: self.read_load_average(),
            gpu: self.read_gpu_utilization(),
            thermal: self.read_thermal_state(),
            uptime: self.read_uptime(),
            identity,
            memory,
        })
    }

    pub fn read_memory(&self) -> Option<MemorySnapshot> {
        let _span = debug_span!("collector.read_memory").entered();

        let Some(counters) = platform::vm_counters() else {
            warn!("virtual memory statistics query failed");
            return None;
        };
        let total = platform::total_memory().unwrap_or(0);
        let snapshot = MemorySnapshot::from_counters(&counters, total);
        if snapshot.is_none() {
            warn!("total physical memory unavailable");
        }
        snapshot
    }

    pub fn read_swap(&self) -> Option<SwapSnapshot> {
        let _span = debug_span!("collector.read_swap").entered();
        let swap = platform::swap_usage();
        if swap.is_none() {
            debug!("swap usage unavailable");
        }
        swap
    }

    pub fn read_memory_pressure(&self) -> MemoryPressure {
        match platform::pressure_level() {
            Some(code) => MemoryPressure::from_code(code),
            None => {
                debug!("memory pressure level unavailable, assuming normal");
                MemoryPressure::Normal
            }
        }
    }

    pub fn read_cpu(&self) -> Option<CpuSnapshot> {
        let _span = debug_span!("collector.read_cpu").entered();
        let Some(ticks) = platform::cpu_ticks() else {
            debug!("per-core cpu ticks unavailable");
            return None;
        };
        let cpu = CpuSnapshot::from_ticks(&ticks);
        if cpu.is_none() {
            debug!("cpu tick total is zero");
        }
        cpu
    }

    pub fn read_load_average(&self) -> Option<LoadAverage> {
        let load = platform::load_average().map(LoadAverage::from);
        if load.is_none() {
            debug!("load average unavailable");
        }
        load
    }

    pub fn read_gpu_utilization(&self) -> Option<f64> {
        let _span = debug_span!("collector.read_gpu").entered();
        let gpu = platform::gpu_utilization();
        if gpu.is_none() {
            debug!("no accelerator reported utilization");
        }
        gpu
    }

    pub fn read_thermal_state(&self) -> ThermalState {
        platform::thermal_level()
            .map(ThermalState::from_level)
            .unwrap_or(ThermalState::Unknown)
    }

    pub fn read_uptime(&self) -> Option<Uptime> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        let uptime = uptime_from_boot(System::boot_time(), now);
        if uptime.is_none() {
            debug!("boot time unavailable");
        }
        uptime
    }

    pub fn read_identity(&self, total_memory: u64) -> SystemIdentity {
        let chip = self.sys.cpus().first().map(|cpu| cpu.brand());
        identity_from_parts(
            platform::hardware_model(),
            chip,
            self.sys.cpus().len(),
            total_memory,
        )
    }
}

fn uptime_from_boot(boot_secs: u64, now_secs: u64) -> Option<Uptime> {
    if boot_secs == 0 || boot_secs > now_secs {
        return None;
    }
    Some(Uptime::from_secs(now_secs - boot_secs))
}

fn identity_from_parts(
    model: Option<String>,
    chip: Option<&str>,
    logical_cores: usize,
    total_memory: u64,
) -> SystemIdentity {
    let model = model
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let chip = chip
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CHIP)
        .to_string();
    SystemIdentity {
        model,
        chip,
        logical_cores,
        memory_gb: total_memory >> 30,
    }
}
