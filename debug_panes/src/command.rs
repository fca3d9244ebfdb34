//! Dispatch of `pane` sub-commands onto the orchestrator.

use log::debug;

use crate::action::Action;
use crate::cli::{self, PaneCommand};
use crate::error::{MuxError, MuxResult};
use crate::orchestrator::{Orchestrator, SplitOptions};
use crate::pane::PaneKey;

/// Result of a dispatched command, for the host to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to run; the pane overlay was shown.
    Overlay,
    /// A pane was created or found.
    Pane(PaneKey),
    /// A refresh pass wrote this many panes.
    Refreshed(usize),
    /// One-shot output written to a pane.
    Written(String),
    /// The command completed.
    Done,
}

/// Parse and run one `pane` command line.
///
/// Fails with [`MuxError::NotInitialized`] before touching anything when no
/// orchestrator is attached. A line without a sub-command, or one that does
/// not parse, shows the multiplexer's pane overlay instead.
pub fn dispatch(orchestrator: Option<&mut Orchestrator>, line: &str) -> MuxResult<Outcome> {
    let orchestrator = orchestrator.ok_or(MuxError::NotInitialized)?;
    match cli::parse_line(line) {
        Some(command) => execute(orchestrator, command),
        None => {
            debug!("No pane sub-command in {line:?}");
            orchestrator.mux().show_all_panes();
            Ok(Outcome::Overlay)
        },
    }
}

/// Run an already parsed sub-command.
pub fn execute(orch: &mut Orchestrator, command: PaneCommand) -> MuxResult<Outcome> {
    match command {
        PaneCommand::Add { direction, pane, size, title } => {
            let from = orch.select(pane.as_deref(), None)?;
            let options = SplitOptions { size, title, ..Default::default() };
            orch.split(direction, Some(&from), options).map(Outcome::Pane)
        },
        PaneCommand::Output { pane, command } => {
            let key = orch.select(Some(pane.as_str()), None)?;
            let action = Action::parse(&command)?;
            orch.output(&key, &action).map(Outcome::Written)
        },
        PaneCommand::Set { no_clearing, pane, command } => {
            let key = orch.select(Some(pane.as_str()), None)?;
            let action = Action::parse(&command)?;
            orch.set(&key, action, !no_clearing).map(Outcome::Refreshed)
        },
        PaneCommand::Unset { pane } => {
            let key = orch.select(Some(pane.as_str()), None)?;
            orch.unset(&key)?;
            Ok(Outcome::Done)
        },
        PaneCommand::Update => Ok(Outcome::Refreshed(orch.update())),
        PaneCommand::Session { name, title, keep, command } => {
            let action =
                if command.is_empty() { None } else { Some(Action::parse(&command)?) };
            let bound = action.is_some();
            let key = orch.session(&name, action, title.as_deref(), !keep)?;
            if bound {
                orch.update();
            }
            Ok(Outcome::Pane(key))
        },
        PaneCommand::Title { pane, title } => {
            let key = orch.select(Some(pane.as_str()), None)?;
            orch.rename(&key, &title)?;
            Ok(Outcome::Done)
        },
        PaneCommand::Close { pane } => {
            let key = orch.select(Some(pane.as_str()), None)?;
            orch.close(&key)?;
            Ok(Outcome::Done)
        },
    }
}
