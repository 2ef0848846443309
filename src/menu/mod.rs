//! Snapshot-to-markup rendering.
//!
//! Everything here is a pure function of a [`SystemSnapshot`]: no I/O and no
//! clock reads, so identical input always yields identical lines.

pub mod bar;
mod basic;
mod compact;
mod graphical;
pub mod theme;

#[cfg(test)]
mod tests;

use std::fmt::{self, Write as _};

use crate::format::format_gb;
use crate::system::snapshot::SystemSnapshot;
use theme::Palette;

/// Printed alone when memory statistics cannot be read.
pub const FATAL_LINE: &str = "ERR";

pub const DEFAULT_MONITOR_APP: &str = "Activity Monitor";

const MONO_FONT: &str = "Menlo";
const MONO_SIZE: &str = "12";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuStyle {
    /// Memory and swap only.
    Basic,
    /// All sections with progress bars.
    #[default]
    Graphical,
    /// All sections as dense monospaced text.
    Compact,
}

impl MenuStyle {
    pub fn label(self) -> &'static str {
        match self {
            MenuStyle::Basic => "basic",
            MenuStyle::Graphical => "graphical",
            MenuStyle::Compact => "compact",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "basic" | "memory" => MenuStyle::Basic,
            "compact" | "text" => MenuStyle::Compact,
            _ => MenuStyle::Graphical,
        }
    }
}

/// Whether `name` can be passed to `open -a` as a single markup parameter.
pub fn is_valid_monitor_app(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['\'', '|', '"', '\n', '\r', '='])
}

#[derive(Debug, Clone)]
pub struct MenuOptions {
    pub style: MenuStyle,
    pub bar_width: usize,
    pub palette: Palette,
    pub monitor_app: String,
    pub show_refresh: bool,
}

impl Default for MenuOptions {
    fn default() -> Self {
        MenuOptions {
            style: MenuStyle::default(),
            bar_width: bar::DEFAULT_WIDTH,
            palette: Palette::default(),
            monitor_app: DEFAULT_MONITOR_APP.to_string(),
            show_refresh: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub title: String,
    pub depth: usize,
    pub params: Vec<(&'static str, String)>,
}

impl MenuItem {
    pub fn new(title: impl Into<String>) -> Self {
        MenuItem {
            title: title.into(),
            depth: 0,
            params: Vec::new(),
        }
    }

    /// An entry shown in the submenu of the preceding top-level entry.
    pub fn nested(title: impl Into<String>) -> Self {
        MenuItem {
            depth: 1,
            ..MenuItem::new(title)
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    pub fn color(self, color: &str) -> Self {
        self.param("color", color)
    }

    pub fn monospace(self) -> Self {
        self.param("font", MONO_FONT).param("size", MONO_SIZE)
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            f.write_str("--")?;
        }
        // `|` starts the parameter list and a newline ends the entry.
        for ch in self.title.chars() {
            match ch {
                '|' => f.write_char('\u{a6}')?,
                '\n' | '\r' => f.write_char(' ')?,
                ch => f.write_char(ch)?,
            }
        }
        if !self.params.is_empty() {
            f.write_str(" |")?;
            for (key, value) in &self.params {
                write!(f, " {key}={value}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuLine {
    Item(MenuItem),
    Separator,
}

impl fmt::Display for MenuLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuLine::Item(item) => write!(f, "{item}"),
            MenuLine::Separator => f.write_str("---"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    lines: Vec<MenuLine>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: MenuItem) {
        self.lines.push(MenuLine::Item(item));
    }

    pub fn separator(&mut self) {
        self.lines.push(MenuLine::Separator);
    }

    pub fn lines(&self) -> &[MenuLine] {
        &self.lines
    }

    /// Rendered text of every line, without trailing newlines.
    pub fn to_lines(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

pub fn build(snapshot: &SystemSnapshot, options: &MenuOptions) -> Menu {
    let _span = tracing::debug_span!("menu.build", style = options.style.label()).entered();

    let mut menu = Menu::new();
    // The only line the host shows outside the dropdown; never carries markup.
    menu.push(MenuItem::new(summary_line(snapshot)));
    menu.separator();

    match options.style {
        MenuStyle::Basic => basic::render(&mut menu, snapshot, options),
        MenuStyle::Graphical => graphical::render(&mut menu, snapshot, options),
        MenuStyle::Compact => compact::render(&mut menu, snapshot, options),
    }

    push_actions(&mut menu, options);
    menu
}

/// `"{usedRAM}/{usedSwap}"`, with `0G` when swap is unavailable.
pub fn summary_line(snapshot: &SystemSnapshot) -> String {
    let swap_used = snapshot
        .swap
        .map(|s| format_gb(s.used))
        .unwrap_or_else(|| "0G".to_string());
    format!("{}/{}", format_gb(snapshot.memory.used()), swap_used)
}

fn push_actions(menu: &mut Menu, options: &MenuOptions) {
    menu.separator();
    let name = if is_valid_monitor_app(&options.monitor_app) {
        options.monitor_app.trim()
    } else {
        DEFAULT_MONITOR_APP
    };
    let app = if name.contains(char::is_whitespace) {
        format!("'{name}'")
    } else {
        name.to_string()
    };
    menu.push(
        MenuItem::new(format!("Open {name}"))
            .param("bash", "open")
            .param("param1", "-a")
            .param("param2", app)
            .param("terminal", "false"),
    );
    if options.show_refresh {
        menu.push(MenuItem::new("Refresh").param("refresh", "true"));
    }
}

/// Upper-cases the first letter of an enum label for display.
fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
