use super::theme::{Severity, swap_severity, thermal_severity, usage_severity};
use super::{Menu, MenuItem, MenuOptions, capitalize};
use crate::format::{
    format_gb, format_load, format_percent_padded, format_uptime, pad_right, truncate_unicode,
};
use crate::system::snapshot::SystemSnapshot;

const LABEL_WIDTH: usize = 6;
const MAX_MODEL_WIDTH: usize = 16;
const MAX_CHIP_WIDTH: usize = 24;

fn row(label: &str, value: impl AsRef<str>) -> MenuItem {
    MenuItem::new(format!("{}{}", pad_right(label, LABEL_WIDTH), value.as_ref())).monospace()
}

pub(super) fn render(menu: &mut Menu, snapshot: &SystemSnapshot, options: &MenuOptions) {
    let palette = &options.palette;
    let id = &snapshot.identity;

    let identity = format!(
        "{} \u{b7} {} \u{b7} {} cores",
        truncate_unicode(&id.model, MAX_MODEL_WIDTH),
        truncate_unicode(&id.chip, MAX_CHIP_WIDTH),
        id.logical_cores
    );
    menu.push(
        MenuItem::new(identity)
            .monospace()
            .color(&palette.muted),
    );

    match snapshot.cpu {
        Some(cpu) => {
            let load = cpu.load();
            menu.push(
                row(
                    "CPU",
                    format!(
                        "{} usr {} sys {} idle {}",
                        format_percent_padded(load),
                        format_percent_padded(cpu.user),
                        format_percent_padded(cpu.system),
                        format_percent_padded(cpu.idle)
                    ),
                )
                .color(palette.color(usage_severity(load))),
            );
        }
        None => menu.push(row("CPU", "   -").color(&palette.muted)),
    }

    let load_avg = snapshot
        .load
        .map_or_else(|| "-".to_string(), |l| format_load(l.one, l.five, l.fifteen));
    menu.push(row("LOAD", load_avg));

    match snapshot.gpu {
        Some(pct) => menu.push(
            row("GPU", format_percent_padded(pct)).color(palette.color(usage_severity(pct))),
        ),
        None => menu.push(row("GPU", "   -").color(&palette.muted)),
    }

    let mem = &snapshot.memory;
    let pct = mem.used_percent();
    menu.push(
        row(
            "MEM",
            format!(
                "{} {} / {} avail {}",
                format_percent_padded(pct),
                format_gb(mem.used()),
                format_gb(mem.total),
                format_gb(mem.available_extended())
            ),
        )
        .color(palette.color(usage_severity(pct))),
    );
    menu.push(
        MenuItem::nested(format!(
            "app {}  cache {}  comp {}",
            format_gb(mem.app_memory),
            format_gb(mem.cached_files),
            format_gb(mem.compressed)
        ))
        .monospace(),
    );
    menu.push(
        MenuItem::nested(format!(
            "wired {}  active {}  inactive {}  free {}",
            format_gb(mem.wired),
            format_gb(mem.active),
            format_gb(mem.inactive),
            format_gb(mem.free)
        ))
        .monospace(),
    );

    match snapshot.swap {
        Some(swap) => menu.push(
            row(
                "SWAP",
                format!("{} / {}", format_gb(swap.used), format_gb(swap.total)),
            )
            .color(palette.color(swap_severity(swap.used))),
        ),
        None => menu.push(row("SWAP", "None").color(&palette.muted)),
    }

    menu.push(
        row("PRES", capitalize(snapshot.pressure.label()))
            .color(palette.color(Severity::from(snapshot.pressure))),
    );
    menu.push(
        row("TEMP", capitalize(snapshot.thermal.label()))
            .color(palette.color_or_muted(thermal_severity(snapshot.thermal))),
    );
    let uptime = snapshot
        .uptime
        .as_ref()
        .map_or_else(|| "unknown".to_string(), format_uptime);
    menu.push(row("UP", uptime));
}
