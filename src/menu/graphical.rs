use super::theme::{Severity, swap_severity, thermal_severity, usage_severity};
use super::{Menu, MenuItem, MenuOptions, bar, capitalize};
use crate::format::{format_gb, format_load, format_percent, format_uptime, truncate_unicode};
use crate::system::snapshot::SystemSnapshot;

const PLACEHOLDER: &str = "-";
const MAX_TITLE_WIDTH: usize = 48;

pub(super) fn render(menu: &mut Menu, snapshot: &SystemSnapshot, options: &MenuOptions) {
    identity_section(menu, snapshot);
    menu.separator();
    cpu_section(menu, snapshot, options);
    menu.separator();
    gpu_section(menu, snapshot, options);
    menu.separator();
    memory_section(menu, snapshot, options);
    menu.separator();
    swap_section(menu, snapshot, options);
    menu.separator();
    status_section(menu, snapshot, options);
}

fn bar_line(pct: Option<f64>, color: &str, options: &MenuOptions) -> MenuItem {
    let bar = match pct {
        Some(pct) => bar::render(pct, options.bar_width),
        None => bar::empty(options.bar_width),
    };
    MenuItem::nested(bar).monospace().color(color)
}

fn identity_section(menu: &mut Menu, snapshot: &SystemSnapshot) {
    let id = &snapshot.identity;
    menu.push(MenuItem::new(truncate_unicode(&id.model, MAX_TITLE_WIDTH)));
    menu.push(MenuItem::nested(format!(
        "Chip: {}",
        truncate_unicode(&id.chip, MAX_TITLE_WIDTH)
    )));
    menu.push(MenuItem::nested(format!("Cores: {}", id.logical_cores)));
    menu.push(MenuItem::nested(format!("Memory: {} GB", id.memory_gb)));
    let uptime = snapshot
        .uptime
        .as_ref()
        .map_or_else(|| "unknown".to_string(), format_uptime);
    menu.push(MenuItem::nested(format!("Uptime: {uptime}")));
}

fn cpu_section(menu: &mut Menu, snapshot: &SystemSnapshot, options: &MenuOptions) {
    let palette = &options.palette;
    match snapshot.cpu {
        Some(cpu) => {
            let load = cpu.load();
            let color = palette.color(usage_severity(load));
            menu.push(MenuItem::new(format!("CPU: {}", format_percent(load))).color(color));
            menu.push(bar_line(Some(load), color, options));
            menu.push(MenuItem::nested(format!("User: {}", format_percent(cpu.user))));
            menu.push(MenuItem::nested(format!(
                "System: {}",
                format_percent(cpu.system)
            )));
            menu.push(MenuItem::nested(format!("Idle: {}", format_percent(cpu.idle))));
        }
        None => {
            menu.push(MenuItem::new(format!("CPU: {PLACEHOLDER}")).color(&palette.muted));
            menu.push(bar_line(None, &palette.muted, options));
            menu.push(MenuItem::nested("None"));
        }
    }
    let load_avg = snapshot.load.map_or_else(
        || PLACEHOLDER.to_string(),
        |l| format_load(l.one, l.five, l.fifteen),
    );
    menu.push(MenuItem::nested(format!("Load Avg: {load_avg}")));
}

fn gpu_section(menu: &mut Menu, snapshot: &SystemSnapshot, options: &MenuOptions) {
    let palette = &options.palette;
    match snapshot.gpu {
        Some(pct) => {
            let color = palette.color(usage_severity(pct));
            menu.push(MenuItem::new(format!("GPU: {}", format_percent(pct))).color(color));
            menu.push(bar_line(Some(pct), color, options));
        }
        None => {
            menu.push(MenuItem::new(format!("GPU: {PLACEHOLDER}")).color(&palette.muted));
            menu.push(bar_line(None, &palette.muted, options));
            menu.push(MenuItem::nested("None"));
        }
    }
}

fn memory_section(menu: &mut Menu, snapshot: &SystemSnapshot, options: &MenuOptions) {
    let mem = &snapshot.memory;
    let pct = mem.used_percent();
    let color = options.palette.color(usage_severity(pct));

    menu.push(
        MenuItem::new(format!(
            "Memory: {} ({} / {})",
            format_percent(pct),
            format_gb(mem.used()),
            format_gb(mem.total)
        ))
        .color(color),
    );
    menu.push(bar_line(Some(pct), color, options));
    for (label, bytes) in [
        ("Used", mem.used()),
        ("Available", mem.available_extended()),
        ("App Memory", mem.app_memory),
        ("Cached Files", mem.cached_files),
        ("Compressed", mem.compressed),
        ("Wired", mem.wired),
        ("Active", mem.active),
        ("Inactive", mem.inactive),
        ("Purgeable", mem.purgeable),
        ("Speculative", mem.speculative),
        ("Free", mem.free),
        ("Total", mem.total),
    ] {
        menu.push(MenuItem::nested(format!("{label}: {}", format_gb(bytes))));
    }
}

fn swap_section(menu: &mut Menu, snapshot: &SystemSnapshot, options: &MenuOptions) {
    let palette = &options.palette;
    match snapshot.swap {
        Some(swap) => {
            let color = palette.color(swap_severity(swap.used));
            menu.push(MenuItem::new(format!("Swap: {}", format_gb(swap.used))).color(color));
            menu.push(MenuItem::nested(format!("Used: {}", format_gb(swap.used))));
            menu.push(MenuItem::nested(format!("Total: {}", format_gb(swap.total))));
        }
        None => {
            menu.push(MenuItem::new("Swap: 0G").color(&palette.muted));
            menu.push(MenuItem::nested("None"));
        }
    }
}

fn status_section(menu: &mut Menu, snapshot: &SystemSnapshot, options: &MenuOptions) {
    let palette = &options.palette;
    menu.push(
        MenuItem::new(format!(
            "Memory Pressure: {}",
            capitalize(snapshot.pressure.label())
        ))
        .color(palette.color(Severity::from(snapshot.pressure))),
    );
    menu.push(
        MenuItem::new(format!("Thermal: {}", capitalize(snapshot.thermal.label())))
            .color(palette.color_or_muted(thermal_severity(snapshot.thermal))),
    );
}
