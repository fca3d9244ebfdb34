//! `pane` sub-command definitions.
//!
//! The debugger hands us the raw argument string of its `pane` command; it is
//! tokenized with shell quoting rules and parsed with clap.

use clap::{Parser, Subcommand};

use crate::layout::Direction;
use crate::split::SizeSpec;

/// Arguments of the `pane` command.
#[derive(Debug, Parser)]
#[command(name = "pane", no_binary_name = true, disable_help_subcommand = true)]
pub struct PaneArgs {
    /// Sub-command; none shows the pane overlay.
    #[command(subcommand)]
    pub command: Option<PaneCommand>,
}

/// A `pane` sub-command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum PaneCommand {
    /// Split a pane (above/below/left/right or k/j/h/l).
    Add {
        /// Where the new pane goes.
        direction: Direction,
        /// Pane to split; the active pane if omitted.
        pane: Option<String>,
        /// Percentage (`30%`) or line/column count.
        #[arg(short, long)]
        size: Option<SizeSpec>,
        /// Title for later references.
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Run a command once and write its output to a pane.
    Output {
        /// Target pane.
        pane: String,
        /// Debugger command, or `!program args...` for an external process.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Bind a command to a pane, refreshed at every stop.
    Set {
        /// Do not clear the pane before each refresh.
        #[arg(short = 'n', long = "no-clearing")]
        no_clearing: bool,
        /// Target pane.
        pane: String,
        /// Debugger command, or `!program args...` for an external process.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Remove a pane's bound command.
    Unset {
        /// Target pane.
        pane: String,
    },
    /// Refresh every bound pane now.
    Update,
    /// Find or create a named session pane.
    Session {
        /// Session name.
        name: String,
        /// Title for later references.
        #[arg(short, long)]
        title: Option<String>,
        /// Keep a created session open when the debugger exits.
        #[arg(short, long)]
        keep: bool,
        /// Command bound to the session pane.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Set a pane's title.
    Title {
        /// Target pane.
        pane: String,
        /// New title.
        title: String,
    },
    /// Close a pane created by this session.
    Close {
        /// Target pane.
        pane: String,
    },
}

/// Parse the argument string of a `pane` command.
///
/// Returns `None` when there is no sub-command or the line does not parse.
pub fn parse_line(line: &str) -> Option<PaneCommand> {
    let tokens = shell_words::split(line).ok()?;
    PaneArgs::try_parse_from(tokens).ok()?.command
}
