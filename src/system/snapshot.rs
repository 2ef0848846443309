use std::time::Duration;

/// Raw virtual-memory page counters as reported by the kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VmCounters {
    pub page_size: u64,
    pub free: u64,
    pub active: u64,
    pub inactive: u64,
    pub wired: u64,
    pub compressed: u64,
    pub purgeable: u64,
    pub speculative: u64,
    /// Anonymous (process-owned) pages.
    pub internal: u64,
    /// File-backed pages.
    pub external: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemorySnapshot {
    pub page_size: u64,
    pub free: u64,
    pub active: u64,
    pub inactive: u64,
    pub wired: u64,
    pub compressed: u64,
    pub purgeable: u64,
    pub speculative: u64,
    pub total: u64,
    pub app_memory: u64,
    pub cached_files: u64,
}

impl MemorySnapshot {
    /// Converts page counters into byte figures. Returns `None` when the
    /// total physical memory is unknown, since every percentage depends on it.
    pub fn from_counters(counters: &VmCounters, total: u64) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let bytes = |pages: u64| pages.saturating_mul(counters.page_size);
        Some(MemorySnapshot {
            page_size: counters.page_size,
            free: bytes(counters.free),
            active: bytes(counters.active),
            inactive: bytes(counters.inactive),
            wired: bytes(counters.wired),
            compressed: bytes(counters.compressed),
            purgeable: bytes(counters.purgeable),
            speculative: bytes(counters.speculative),
            total,
            app_memory: bytes(counters.internal.saturating_sub(counters.purgeable)),
            cached_files: bytes(counters.external.saturating_add(counters.purgeable)),
        })
    }

    pub fn used(&self) -> u64 {
        self.active + self.wired + self.compressed
    }

    pub fn available(&self) -> u64 {
        self.free + self.inactive
    }

    /// Available memory counting purgeable pages as reclaimable.
    pub fn available_extended(&self) -> u64 {
        self.available() + self.purgeable
    }

    pub fn used_percent(&self) -> f64 {
        self.used() as f64 / self.total as f64 * 100.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapSnapshot {
    pub used: u64,
    pub total: u64,
}

/// Cumulative scheduler ticks summed over every logical core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub system: u64,
    pub idle: u64,
    pub nice: u64,
}

impl CpuTicks {
    pub fn total(&self) -> u64 {
        self.user + self.system + self.idle + self.nice
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpuSnapshot {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub nice: f64,
}

impl CpuSnapshot {
    pub fn from_ticks(ticks: &CpuTicks) -> Option<Self> {
        let total = ticks.total();
        if total == 0 {
            return None;
        }
        let pct = |v: u64| v as f64 / total as f64 * 100.0;
        Some(CpuSnapshot {
            user: pct(ticks.user),
            system: pct(ticks.system),
            idle: pct(ticks.idle),
            nice: pct(ticks.nice),
        })
    }

    /// Busy share of all ticks; idle is excluded.
    pub fn load(&self) -> f64 {
        self.user + self.system + self.nice
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

impl From<[f64; 3]> for LoadAverage {
    fn from(samples: [f64; 3]) -> Self {
        LoadAverage {
            one: samples[0],
            five: samples[1],
            fifteen: samples[2],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ThermalState {
    Nominal,
    Fair,
    Serious,
    Critical,
    Unknown,
}

impl ThermalState {
    pub fn from_level(level: u64) -> Self {
        match level {
            0 => ThermalState::Nominal,
            1 => ThermalState::Fair,
            2 => ThermalState::Serious,
            3 | 4 => ThermalState::Critical,
            _ => ThermalState::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThermalState::Nominal => "nominal",
            ThermalState::Fair => "fair",
            ThermalState::Serious => "serious",
            ThermalState::Critical => "critical",
            ThermalState::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemoryPressure {
    #[default]
    Normal,
    Warn,
    Critical,
}

impl MemoryPressure {
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => MemoryPressure::Warn,
            4 => MemoryPressure::Critical,
            _ => MemoryPressure::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MemoryPressure::Normal => "normal",
            MemoryPressure::Warn => "warn",
            MemoryPressure::Critical => "critical",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemIdentity {
    pub model: String,
    pub chip: String,
    pub logical_cores: usize,
    pub memory_gb: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Uptime(pub Duration);

impl Uptime {
    pub fn from_secs(secs: u64) -> Self {
        Uptime(Duration::from_secs(secs))
    }
}

pub struct SystemSnapshot {
    pub memory: MemorySnapshot,
    pub swap: Option<SwapSnapshot>,
    pub pressure: MemoryPressure,
    pub cpu: Option<CpuSnapshot>,
    pub load: Option<LoadAverage>,
    pub gpu: Option<f64>,
    pub thermal: ThermalState,
    pub uptime: Option<Uptime>,
    pub identity: SystemIdentity,
}
