//! Split sizing and `split-window` argument construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MuxError;
use crate::layout::Direction;
use crate::protocol::PANE_FORMAT;

/// Command run in a pane created without one: blocks on stdin so the pane
/// stays open and addressable.
pub const PASSTHROUGH_COMMAND: [&str; 2] = ["cat", "-"];

/// Size of a new pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeSpec {
    /// Percentage of the containing window (1–99).
    Percent(u8),
    /// Absolute number of lines or columns.
    Cells(u32),
}

impl SizeSpec {
    /// Multiplexer flags encoding this size.
    pub fn flags(self) -> [String; 2] {
        match self {
            SizeSpec::Percent(p) => ["-p".into(), p.to_string()],
            SizeSpec::Cells(n) => ["-l".into(), n.to_string()],
        }
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        SizeSpec::Percent(50)
    }
}

impl FromStr for SizeSpec {
    type Err = MuxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || MuxError::InvalidSize(s.to_string());

        if let Some(percent) = s.strip_suffix('%') {
            let value: u8 = percent.parse().map_err(|_| invalid())?;
            if !(1..=99).contains(&value) {
                return Err(invalid());
            }
            return Ok(SizeSpec::Percent(value));
        }

        match s.parse::<u32>() {
            Ok(0) | Err(_) => Err(invalid()),
            Ok(n) => Ok(SizeSpec::Cells(n)),
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Percent(p) => write!(f, "{p}%"),
            SizeSpec::Cells(n) => write!(f, "{n}"),
        }
    }
}

/// Build the `split-window` argument vector.
///
/// The reply is requested in [`PANE_FORMAT`] and the pane is created without
/// taking focus (`-d`), so the debugger prompt keeps the cursor.
pub fn split_args(
    target: &str,
    direction: Direction,
    size: SizeSpec,
    command: Option<&[String]>,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "split-window".into(),
        "-P".into(),
        "-d".into(),
        "-F".into(),
        PANE_FORMAT.into(),
        direction.layout_flag().into(),
    ];
    if direction.before() {
        args.push("-b".into());
    }
    args.extend(size.flags());
    args.push("-t".into());
    args.push(target.into());
    match command {
        Some(command) if !command.is_empty() => args.extend(command.iter().cloned()),
        _ => args.extend(PASSTHROUGH_COMMAND.iter().map(|s| s.to_string())),
    }
    args
}
