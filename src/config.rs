use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::menu::theme::Palette;
use crate::menu::{DEFAULT_MONITOR_APP, MenuOptions, MenuStyle, bar, is_valid_monitor_app};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub colors: ColorsConfig,
    pub actions: ActionsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub style: String,
    pub bar_width: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            style: "graphical".to_string(),
            bar_width: 16,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub low: String,
    pub medium: String,
    pub high: String,
    pub critical: String,
    pub muted: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            low: "green".to_string(),
            medium: "yellow".to_string(),
            high: "orange".to_string(),
            critical: "red".to_string(),
            muted: "gray".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    pub monitor_app: String,
    pub show_refresh: bool,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        ActionsConfig {
            monitor_app: DEFAULT_MONITOR_APP.to_string(),
            show_refresh: true,
        }
    }
}

impl Config {
    pub fn menu_options(&self) -> MenuOptions {
        let monitor_app = self.actions.monitor_app.trim();
        let monitor_app = if is_valid_monitor_app(monitor_app) {
            monitor_app.to_string()
        } else {
            if !monitor_app.is_empty() {
                tracing::warn!(monitor_app, "monitor app name cannot be quoted, using default");
            }
            DEFAULT_MONITOR_APP.to_string()
        };
        MenuOptions {
            style: MenuStyle::from_str_config(&self.general.style),
            bar_width: self.general.bar_width.clamp(1, bar::MAX_WIDTH),
            palette: Palette::from_config(&self.colors),
            monitor_app,
            show_refresh: self.actions.show_refresh,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vitals").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "invalid config, using defaults");
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}
