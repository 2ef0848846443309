use crate::config::ColorsConfig;
use crate::system::snapshot::{MemoryPressure, ThermalState};

const GIB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Buckets a usage percentage; each threshold belongs to the higher bucket.
pub fn usage_severity(pct: f64) -> Severity {
    if pct >= 90.0 {
        Severity::Critical
    } else if pct >= 70.0 {
        Severity::High
    } else if pct >= 50.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

pub fn swap_severity(used_bytes: u64) -> Severity {
    if used_bytes >= 10 * GIB {
        Severity::Critical
    } else if used_bytes >= 5 * GIB {
        Severity::High
    } else if used_bytes >= GIB {
        Severity::Medium
    } else {
        Severity::Low
    }
}

impl From<MemoryPressure> for Severity {
    fn from(pressure: MemoryPressure) -> Self {
        match pressure {
            MemoryPressure::Normal => Severity::Low,
            MemoryPressure::Warn => Severity::Medium,
            MemoryPressure::Critical => Severity::Critical,
        }
    }
}

/// `None` for an unknown thermal state, which renders muted.
pub fn thermal_severity(state: ThermalState) -> Option<Severity> {
    match state {
        ThermalState::Nominal => Some(Severity::Low),
        ThermalState::Fair => Some(Severity::Medium),
        ThermalState::Serious => Some(Severity::High),
        ThermalState::Critical => Some(Severity::Critical),
        ThermalState::Unknown => None,
    }
}

/// Named colors understood by the menu-bar host, or `#RRGGBB`.
pub fn is_menu_color(s: &str) -> bool {
    const NAMED: [&str; 9] = [
        "green", "yellow", "orange", "red", "white", "gray", "black", "blue", "purple",
    ];
    if let Some(hex) = s.strip_prefix('#') {
        return hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    NAMED.contains(&s)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub low: String,
    pub medium: String,
    pub high: String,
    pub critical: String,
    pub muted: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            low: "green".to_string(),
            medium: "yellow".to_string(),
            high: "orange".to_string(),
            critical: "red".to_string(),
            muted: "gray".to_string(),
        }
    }
}

impl Palette {
    /// Builds a palette from config, keeping the default for any entry that
    /// is not a recognised color.
    pub fn from_config(colors: &ColorsConfig) -> Self {
        let defaults = Palette::default();
        let pick = |value: &str, fallback: String| {
            let value = value.trim().to_lowercase();
            if is_menu_color(&value) {
                value
            } else {
                fallback
            }
        };
        Palette {
            low: pick(&colors.low, defaults.low),
            medium: pick(&colors.medium, defaults.medium),
            high: pick(&colors.high, defaults.high),
            critical: pick(&colors.critical, defaults.critical),
            muted: pick(&colors.muted, defaults.muted),
        }
    }

    pub fn color(&self, severity: Severity) -> &str {
        match severity {
            Severity::Low => &self.low,
            Severity::Medium => &self.medium,
            Severity::High => &self.high,
            Severity::Critical => &self.critical,
        }
    }

    pub fn color_or_muted(&self, severity: Option<Severity>) -> &str {
        severity.map_or(self.muted.as_str(), |s| self.color(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_thresholds_are_closed_above() {
        assert_eq!(usage_severity(90.0), Severity::Critical);
        assert_eq!(usage_severity(89.999), Severity::High);
        assert_eq!(usage_severity(70.0), Severity::High);
        assert_eq!(usage_severity(69.99), Severity::Medium);
        assert_eq!(usage_severity(50.0), Severity::Medium);
        assert_eq!(usage_severity(49.9), Severity::Low);
        assert_eq!(usage_severity(0.0), Severity::Low);
    }

    #[test]
    fn swap_thresholds() {
        assert_eq!(swap_severity(0), Severity::Low);
        assert_eq!(swap_severity(GIB - 1), Severity::Low);
        assert_eq!(swap_severity(GIB), Severity::Medium);
        assert_eq!(swap_severity(5 * GIB), Severity::High);
        assert_eq!(swap_severity(10 * GIB), Severity::Critical);
    }

    #[test]
    fn enum_tags() {
        assert_eq!(Severity::from(MemoryPressure::Normal), Severity::Low);
        assert_eq!(Severity::from(MemoryPressure::Warn), Severity::Medium);
        assert_eq!(Severity::from(MemoryPressure::Critical), Severity::Critical);
        assert_eq!(thermal_severity(ThermalState::Serious), Some(Severity::High));
        assert_eq!(thermal_severity(ThermalState::Unknown), None);
    }

    #[test]
    fn default_palette_colors() {
        let palette = Palette::default();
        assert_eq!(palette.color(Severity::Low), "green");
        assert_eq!(palette.color(Severity::High), "orange");
        assert_eq!(palette.color_or_muted(None), "gray");
    }

    #[test]
    fn palette_from_config_rejects_bad_colors() {
        let colors = ColorsConfig {
            low: "#00FF7f".to_string(),
            medium: "chartreuse-ish".to_string(),
            high: " Orange ".to_string(),
            critical: "#12345".to_string(),
            muted: "white".to_string(),
        };
        let palette = Palette::from_config(&colors);
        assert_eq!(palette.low, "#00ff7f");
        assert_eq!(palette.medium, "yellow");
        assert_eq!(palette.high, "orange");
        assert_eq!(palette.critical, "red");
        assert_eq!(palette.muted, "white");
    }
}
