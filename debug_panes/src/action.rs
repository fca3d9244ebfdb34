//! What produces a pane's content.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use log::debug;

use crate::error::{MuxError, MuxResult};
use crate::process;

/// Error type returned by the host debugger's command facility.
pub type HostError = Box<dyn Error + Send + Sync>;

/// The debugger the orchestrator is attached to.
pub trait Host: Send {
    /// Execute a debugger command and capture its textual output.
    fn execute(&self, command: &str) -> Result<Option<String>, HostError>;

    /// Run an external process and capture its merged output.
    fn spawn(&self, argv: &[String], timeout: Option<Duration>) -> String {
        process::run_merged(argv, timeout)
    }
}

/// A bound pane action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A debugger command whose captured output fills the pane.
    Debugger(String),
    /// An external process whose merged stdout/stderr fills the pane.
    External(Vec<String>),
}

impl Action {
    /// Debugger command action.
    pub fn debugger(command: impl Into<String>) -> MuxResult<Self> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(MuxError::EmptyCommand);
        }
        Ok(Action::Debugger(command))
    }

    /// External process action from a pre-tokenized argument vector.
    pub fn external(argv: Vec<String>) -> MuxResult<Self> {
        if argv.is_empty() {
            return Err(MuxError::EmptyCommand);
        }
        Ok(Action::External(argv))
    }

    /// Build an action from command tokens.
    ///
    /// A leading `!` selects an external process made of the remaining
    /// tokens; anything else is a debugger command. The program must be a
    /// single word: `"!grep -n x f"` quoted as one token is rejected rather
    /// than run as a program literally named `grep -n x f`.
    pub fn parse(tokens: &[String]) -> MuxResult<Self> {
        let Some(first) = tokens.first() else {
            return Err(MuxError::EmptyCommand);
        };

        match first.strip_prefix('!') {
            Some(program) => {
                let argv = std::iter::once(program)
                    .filter(|program| !program.is_empty())
                    .chain(tokens[1..].iter().map(String::as_str))
                    .map(String::from)
                    .collect::<Vec<_>>();
                if let Some(program) = argv.first().filter(|p| p.contains(char::is_whitespace)) {
                    return Err(MuxError::QuotedProgram(program.clone()));
                }
                Action::external(argv)
            },
            None => Action::debugger(tokens.join(" ")),
        }
    }

    /// Produce the action's text.
    ///
    /// Never fails: a failing command yields its diagnostic as the text.
    pub fn run(&self, host: &dyn Host, timeout: Option<Duration>) -> String {
        match self {
            Action::Debugger(command) => {
                debug!("Running debugger command {command:?}");
                match host.execute(command) {
                    Ok(output) => output.unwrap_or_default(),
                    Err(err) => err.to_string(),
                }
            },
            Action::External(argv) => {
                debug!("Running external command {argv:?}");
                host.spawn(argv, timeout)
            },
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Debugger(command) => f.write_str(command),
            Action::External(argv) => write!(f, "!{}", shell_words::join(argv)),
        }
    }
}
