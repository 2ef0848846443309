use super::theme::Severity;
use super::{Menu, MenuItem, MenuOptions, capitalize};
use crate::format::format_gb;
use crate::system::snapshot::SystemSnapshot;

pub(super) fn render(menu: &mut Menu, snapshot: &SystemSnapshot, options: &MenuOptions) {
    let palette = &options.palette;
    let mem = &snapshot.memory;

    menu.push(
        MenuItem::new(format!(
            "Memory Pressure: {}",
            capitalize(snapshot.pressure.label())
        ))
        .color(palette.color(Severity::from(snapshot.pressure))),
    );
    menu.separator();

    menu.push(MenuItem::new("RAM").color(&palette.muted));
    for (label, bytes) in [
        ("Used", mem.used()),
        ("Available", mem.available()),
        ("Compressed", mem.compressed),
        ("Wired", mem.wired),
        ("Active", mem.active),
        ("Inactive", mem.inactive),
        ("Free", mem.free),
        ("Total", mem.total),
    ] {
        menu.push(MenuItem::nested(format!("{label}: {}", format_gb(bytes))));
    }

    menu.separator();
    menu.push(MenuItem::new("Swap").color(&palette.muted));
    match snapshot.swap {
        Some(swap) => {
            menu.push(MenuItem::nested(format!("Used: {}", format_gb(swap.used))));
            menu.push(MenuItem::nested(format!("Total: {}", format_gb(swap.total))));
        }
        None => menu.push(MenuItem::nested("Not available")),
    }
}
