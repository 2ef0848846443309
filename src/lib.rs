//! Menu-bar resource monitor: one snapshot of host counters per run,
//! rendered as SwiftBar/xbar markup.

pub mod config;
pub mod format;
pub mod menu;
pub mod system;

use std::io::{self, Write};
use std::process::ExitCode;

use menu::{FATAL_LINE, MenuOptions};
use system::snapshot::SystemSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    MemoryUnavailable,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Rendered => 0,
            Outcome::MemoryUnavailable => 1,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Writes the menu for `snapshot`, or the lone fatal line when memory could
/// not be read.
pub fn emit<W: Write>(
    snapshot: Option<&SystemSnapshot>,
    options: &MenuOptions,
    out: &mut W,
) -> io::Result<Outcome> {
    let outcome = match snapshot {
        Some(snapshot) => {
            write!(out, "{}", menu::build(snapshot, options))?;
            Outcome::Rendered
        }
        None => {
            writeln!(out, "{FATAL_LINE}")?;
            Outcome::MemoryUnavailable
        }
    };
    out.flush()?;
    Ok(outcome)
}
