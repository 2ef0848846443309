#[cfg(feature = "perf-tracing")]
mod perf;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use vitals::config::{load_config, load_config_from_path};
use vitals::menu::{MenuOptions, MenuStyle, bar};
use vitals::system::collector::Collector;

#[derive(Parser)]
#[command(
    name = "vitals",
    about = "Menu-bar plugin reporting memory, CPU, GPU and thermal pressure"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Menu style: basic, graphical, compact
    #[arg(long)]
    style: Option<String>,

    /// Progress bar width in cells
    #[arg(long)]
    bar_width: Option<usize>,

    /// Trace output file (JSON lines). Requires the `perf-tracing` feature.
    #[arg(long)]
    trace_output: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(&cli)?;
    let options = menu_options_for_cli(&cli)?;

    let collector = Collector::new();
    let snapshot = collector.snapshot();

    let mut out = io::stdout().lock();
    let outcome = vitals::emit(snapshot.as_ref(), &options, &mut out)?;
    Ok(outcome.exit_code())
}

fn menu_options_for_cli(cli: &Cli) -> Result<MenuOptions> {
    let config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };
    let mut options = config.menu_options();

    if let Some(ref style) = cli.style {
        options.style = MenuStyle::from_str_config(style);
    }
    if let Some(width) = cli.bar_width {
        if width == 0 || width > bar::MAX_WIDTH {
            return Err(eyre!("--bar-width must be between 1 and {}", bar::MAX_WIDTH));
        }
        options.bar_width = width;
    }

    Ok(options)
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.trace_output else {
        return Ok(());
    };

    #[cfg(not(feature = "perf-tracing"))]
    {
        let _ = path;
        Err(eyre!(
            "--trace-output requires the `perf-tracing` feature; run with `cargo run --features perf-tracing -- --trace-output <PATH>`"
        ))
    }

    #[cfg(feature = "perf-tracing")]
    {
        perf::init_tracing_json(path)
    }
}
