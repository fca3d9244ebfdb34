//! Access to the multiplexer's control interface.

use std::process::Command;

use log::debug;

use crate::config::PanesConfig;
use crate::error::{MuxError, MuxResult};

/// Something that can run a multiplexer control command and return its stdout.
///
/// Implemented by [`TmuxControl`] for the real multiplexer; tests substitute a
/// recording double.
pub trait Control: Send {
    /// Run one control command, failing on a non-zero exit.
    fn invoke(&self, args: &[String]) -> MuxResult<String>;
}

/// Control interface backed by the `tmux` executable.
#[derive(Debug, Clone, Default)]
pub struct TmuxControl {
    program: String,
    socket_name: Option<String>,
}

impl TmuxControl {
    /// Create a control handle for `program`, optionally on a named socket (`-L`).
    pub fn new(program: impl Into<String>, socket_name: Option<String>) -> Self {
        Self { program: program.into(), socket_name }
    }

    /// Control handle for the program and socket named in `config`.
    pub fn from_config(config: &PanesConfig) -> Self {
        Self::new(config.tmux_program.clone(), config.socket_name.clone())
    }
}

impl Control for TmuxControl {
    fn invoke(&self, args: &[String]) -> MuxResult<String> {
        let program = if self.program.is_empty() { "tmux" } else { self.program.as_str() };
        let mut command = Command::new(program);
        if let Some(socket) = &self.socket_name {
            command.arg("-L").arg(socket);
        }
        command.args(args);

        debug!("Invoking {program} {args:?}");
        let output = command
            .output()
            .map_err(|err| MuxError::invocation(args, format!("failed to run {program}: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MuxError::invocation(args, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
