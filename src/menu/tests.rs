use super::*;
use crate::system::snapshot::{
    CpuSnapshot, CpuTicks, LoadAverage, MemoryPressure, MemorySnapshot, SwapSnapshot,
    SystemIdentity, ThermalState, Uptime, VmCounters,
};

const GIB: u64 = 1024 * 1024 * 1024;
const PAGE: u64 = 16_384;
const PAGES_PER_GIB: u64 = GIB / PAGE;

/// 8 GiB used of 16 GiB, no swap, 40% CPU, no GPU, up 2h 15m.
fn fixture() -> SystemSnapshot {
    let counters = VmCounters {
        page_size: PAGE,
        free: 2 * PAGES_PER_GIB,
        active: 4 * PAGES_PER_GIB,
        inactive: 4 * PAGES_PER_GIB,
        wired: 3 * PAGES_PER_GIB,
        compressed: PAGES_PER_GIB,
        purgeable: PAGES_PER_GIB / 2,
        speculative: PAGES_PER_GIB / 4,
        internal: 5 * PAGES_PER_GIB,
        external: 2 * PAGES_PER_GIB,
    };
    let ticks = CpuTicks {
        user: 25,
        system: 15,
        idle: 60,
        nice: 0,
    };
    SystemSnapshot {
        memory: MemorySnapshot::from_counters(&counters, 16 * GIB).unwrap(),
        swap: None,
        pressure: MemoryPressure::Normal,
        cpu: CpuSnapshot::from_ticks(&ticks),
        load: Some(LoadAverage::from([1.5, 1.25, 1.0])),
        gpu: None,
        thermal: ThermalState::Nominal,
        uptime: Some(Uptime::from_secs(2 * 3600 + 15 * 60)),
        identity: SystemIdentity {
            model: "MacBookPro18,3".to_string(),
            chip: "Apple M1 Pro".to_string(),
            logical_cores: 10,
            memory_gb: 16,
        },
    }
}

fn options(style: MenuStyle) -> MenuOptions {
    MenuOptions {
        style,
        ..MenuOptions::default()
    }
}

fn render(snapshot: &SystemSnapshot, style: MenuStyle) -> Vec<String> {
    build(snapshot, &options(style)).to_lines()
}

#[test]
fn summary_is_first_line_and_plain() {
    let lines = render(&fixture(), MenuStyle::Graphical);
    assert_eq!(lines[0], "8.0G/0G");
    assert_eq!(lines[1], "---");
}

#[test]
fn summary_uses_swap_when_present() {
    let mut snapshot = fixture();
    snapshot.swap = Some(SwapSnapshot {
        used: GIB + GIB / 2,
        total: 4 * GIB,
    });
    assert_eq!(summary_line(&snapshot), "8.0G/1.5G");
}

#[test]
fn graphical_layout() {
    let menu = build(&fixture(), &MenuOptions::default());
    insta::assert_snapshot!(menu.to_lines().join("\n"), @r"
    8.0G/0G
    ---
    MacBookPro18,3
    --Chip: Apple M1 Pro
    --Cores: 10
    --Memory: 16 GB
    --Uptime: 2h 15m
    ---
    CPU: 40% | color=green
    --██████░░░░░░░░░░ | font=Menlo size=12 color=green
    --User: 25%
    --System: 15%
    --Idle: 60%
    --Load Avg: 1.50 1.25 1.00
    ---
    GPU: - | color=gray
    --░░░░░░░░░░░░░░░░ | font=Menlo size=12 color=gray
    --None
    ---
    Memory: 50% (8.0G / 16G) | color=yellow
    --████████░░░░░░░░ | font=Menlo size=12 color=yellow
    --Used: 8.0G
    --Available: 6.5G
    --App Memory: 4.5G
    --Cached Files: 2.5G
    --Compressed: 1.0G
    --Wired: 3.0G
    --Active: 4.0G
    --Inactive: 4.0G
    --Purgeable: 0.50G
    --Speculative: 0.25G
    --Free: 2.0G
    --Total: 16G
    ---
    Swap: 0G | color=gray
    --None
    ---
    Memory Pressure: Normal | color=green
    Thermal: Nominal | color=green
    ---
    Open Activity Monitor | bash=open param1=-a param2='Activity Monitor' terminal=false
    Refresh | refresh=true
    ");
}

#[test]
fn graphical_sections_appear_in_order() {
    let lines = render(&fixture(), MenuStyle::Graphical);
    let position = |prefix: &str| {
        lines
            .iter()
            .position(|l| l.starts_with(prefix))
            .unwrap_or_else(|| panic!("missing line starting with {prefix:?}"))
    };
    let order = [
        position("MacBookPro18,3"),
        position("CPU: "),
        position("GPU: "),
        position("Memory: "),
        position("Swap: "),
        position("Memory Pressure: "),
        position("Thermal: "),
        position("Open "),
    ];
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");
}

#[test]
fn unavailable_cpu_renders_placeholder() {
    let mut snapshot = fixture();
    snapshot.cpu = None;
    snapshot.load = None;
    let lines = render(&snapshot, MenuStyle::Graphical);
    let cpu = lines.iter().position(|l| l.starts_with("CPU: ")).unwrap();
    assert_eq!(lines[cpu], "CPU: - | color=gray");
    assert!(lines[cpu + 1].starts_with(&format!("--{}", bar::empty(16))));
    assert_eq!(lines[cpu + 2], "--None");
    assert_eq!(lines[cpu + 3], "--Load Avg: -");
}

#[test]
fn available_gpu_gets_bar_and_severity_color() {
    let mut snapshot = fixture();
    snapshot.gpu = Some(92.0);
    let lines = render(&snapshot, MenuStyle::Graphical);
    let gpu = lines.iter().position(|l| l.starts_with("GPU: ")).unwrap();
    assert_eq!(lines[gpu], "GPU: 92% | color=red");
    assert_eq!(
        lines[gpu + 1],
        format!("--{} | font=Menlo size=12 color=red", bar::render(92.0, 16))
    );
    assert_eq!(lines[gpu + 2], "---");
}

#[test]
fn swap_section_with_usage() {
    let mut snapshot = fixture();
    snapshot.swap = Some(SwapSnapshot {
        used: 6 * GIB,
        total: 8 * GIB,
    });
    let lines = render(&snapshot, MenuStyle::Graphical);
    let swap = lines.iter().position(|l| l.starts_with("Swap: ")).unwrap();
    assert_eq!(lines[swap], "Swap: 6.0G | color=orange");
    assert_eq!(lines[swap + 1], "--Used: 6.0G");
    assert_eq!(lines[swap + 2], "--Total: 8.0G");
}

#[test]
fn pressure_and_thermal_colors_follow_state() {
    let mut snapshot = fixture();
    snapshot.pressure = MemoryPressure::Critical;
    snapshot.thermal = ThermalState::Unknown;
    let lines = render(&snapshot, MenuStyle::Graphical);
    assert!(lines.contains(&"Memory Pressure: Critical | color=red".to_string()));
    assert!(lines.contains(&"Thermal: Unknown | color=gray".to_string()));

    snapshot.thermal = ThermalState::Serious;
    let lines = render(&snapshot, MenuStyle::Graphical);
    assert!(lines.contains(&"Thermal: Serious | color=orange".to_string()));
}

#[test]
fn missing_uptime_is_unknown() {
    let mut snapshot = fixture();
    snapshot.uptime = None;
    let lines = render(&snapshot, MenuStyle::Graphical);
    assert!(lines.contains(&"--Uptime: unknown".to_string()));
}

#[test]
fn bar_width_option_is_honoured() {
    let snapshot = fixture();
    let options = MenuOptions {
        bar_width: 10,
        ..MenuOptions::default()
    };
    let lines = build(&snapshot, &options).to_lines();
    let mem = lines.iter().position(|l| l.starts_with("Memory: ")).unwrap();
    assert_eq!(
        lines[mem + 1],
        "--\u{2588}\u{2588}\u{2588}\u{2588}\u{2588}\u{2591}\u{2591}\u{2591}\u{2591}\u{2591} | font=Menlo size=12 color=yellow"
    );
}

#[test]
fn basic_layout() {
    let menu = build(&fixture(), &options(MenuStyle::Basic));
    insta::assert_snapshot!(menu.to_lines().join("\n"), @r"
    8.0G/0G
    ---
    Memory Pressure: Normal | color=green
    ---
    RAM | color=gray
    --Used: 8.0G
    --Available: 6.0G
    --Compressed: 1.0G
    --Wired: 3.0G
    --Active: 4.0G
    --Inactive: 4.0G
    --Free: 2.0G
    --Total: 16G
    ---
    Swap | color=gray
    --Not available
    ---
    Open Activity Monitor | bash=open param1=-a param2='Activity Monitor' terminal=false
    Refresh | refresh=true
    ");
}

#[test]
fn basic_swap_lines() {
    let mut snapshot = fixture();
    snapshot.swap = Some(SwapSnapshot {
        used: GIB / 4,
        total: 2 * GIB,
    });
    let lines = render(&snapshot, MenuStyle::Basic);
    let swap = lines.iter().position(|l| l == "Swap | color=gray").unwrap();
    assert_eq!(lines[swap + 1], "--Used: 0.25G");
    assert_eq!(lines[swap + 2], "--Total: 2.0G");
}

#[test]
fn compact_rows_are_aligned() {
    let lines = render(&fixture(), MenuStyle::Compact);
    assert_eq!(
        lines[2],
        "MacBookPro18,3 \u{b7} Apple M1 Pro \u{b7} 10 cores | font=Menlo size=12 color=gray"
    );
    assert_eq!(
        lines[3],
        "CPU    40% usr  25% sys  15% idle  60% | font=Menlo size=12 color=green"
    );
    assert_eq!(lines[4], "LOAD  1.50 1.25 1.00 | font=Menlo size=12");
    assert_eq!(lines[5], "GPU      - | font=Menlo size=12 color=gray");
    assert_eq!(
        lines[6],
        "MEM    50% 8.0G / 16G avail 6.5G | font=Menlo size=12 color=yellow"
    );
    assert_eq!(
        lines[7],
        "--app 4.5G  cache 2.5G  comp 1.0G | font=Menlo size=12"
    );
    assert_eq!(
        lines[8],
        "--wired 3.0G  active 4.0G  inactive 4.0G  free 2.0G | font=Menlo size=12"
    );
    assert_eq!(lines[9], "SWAP  None | font=Menlo size=12 color=gray");
    assert_eq!(lines[10], "PRES  Normal | font=Menlo size=12 color=green");
    assert_eq!(lines[11], "TEMP  Nominal | font=Menlo size=12 color=green");
    assert_eq!(lines[12], "UP    2h 15m | font=Menlo size=12");
    assert_eq!(lines[13], "---");
}

#[test]
fn actions_respect_options() {
    let options = MenuOptions {
        monitor_app: "btop".to_string(),
        show_refresh: false,
        ..MenuOptions::default()
    };
    let lines = build(&fixture(), &options).to_lines();
    assert_eq!(
        lines.last().map(String::as_str),
        Some("Open btop | bash=open param1=-a param2=btop terminal=false")
    );
    assert!(!lines.iter().any(|l| l.starts_with("Refresh")));
}

#[test]
fn unquotable_monitor_app_uses_default_action() {
    let options = MenuOptions {
        monitor_app: "Bob's | Monitor".to_string(),
        ..MenuOptions::default()
    };
    let lines = build(&fixture(), &options).to_lines();
    assert!(lines.contains(
        &"Open Activity Monitor | bash=open param1=-a param2='Activity Monitor' terminal=false"
            .to_string()
    ));
}

#[test]
fn pipes_and_newlines_in_titles_are_neutralised() {
    let mut snapshot = fixture();
    snapshot.identity.model = "Mac|Pro\nX".to_string();
    let lines = render(&snapshot, MenuStyle::Graphical);
    assert_eq!(lines[2], "Mac\u{a6}Pro X");
    for line in &lines {
        assert!(line.matches('|').count() <= 1, "{line}");
    }
    assert_eq!(
        MenuItem::new("a|b").color("red").to_string(),
        "a\u{a6}b | color=red"
    );
}

#[test]
fn compact_identity_keeps_core_count() {
    let mut snapshot = fixture();
    snapshot.identity.model = "Mac".to_string();
    snapshot.identity.chip = "Intel(R) Xeon(R) Platinum 8375C Processor".to_string();
    snapshot.identity.logical_cores = 1;
    let lines = render(&snapshot, MenuStyle::Compact);
    let identity = lines[2].split(" | ").next().unwrap();
    assert!(identity.ends_with(" \u{b7} 1 cores"), "{identity}");
    assert!(identity.starts_with("Mac \u{b7} Intel(R) Xeon(R) Platin\u{2026}"), "{identity}");
}

#[test]
fn custom_palette_reaches_markup() {
    let mut options = MenuOptions::default();
    options.palette.low = "#00ff00".to_string();
    let lines = build(&fixture(), &options).to_lines();
    assert!(lines.contains(&"CPU: 40% | color=#00ff00".to_string()));
}

#[test]
fn rendering_is_deterministic() {
    let snapshot = fixture();
    for style in [MenuStyle::Basic, MenuStyle::Graphical, MenuStyle::Compact] {
        assert_eq!(render(&snapshot, style), render(&snapshot, style));
    }
}

#[test]
fn display_ends_every_line_with_newline() {
    let menu = build(&fixture(), &options(MenuStyle::Basic));
    let text = menu.to_string();
    assert!(text.ends_with("refresh=true\n"));
    assert_eq!(text.lines().count(), menu.lines().len());
}

#[test]
fn item_markup() {
    assert_eq!(MenuItem::new("Title").to_string(), "Title");
    assert_eq!(
        MenuItem::nested("Child").color("red").to_string(),
        "--Child | color=red"
    );
    assert_eq!(MenuLine::Separator.to_string(), "---");
}

#[test]
fn style_names_parse() {
    assert_eq!(MenuStyle::from_str_config("Basic"), MenuStyle::Basic);
    assert_eq!(MenuStyle::from_str_config("memory"), MenuStyle::Basic);
    assert_eq!(MenuStyle::from_str_config("COMPACT"), MenuStyle::Compact);
    assert_eq!(MenuStyle::from_str_config(""), MenuStyle::Graphical);
}
