//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use debug_panes::action::{Host, HostError};
use debug_panes::config::PanesConfig;
use debug_panes::control::Control;
use debug_panes::error::{MuxError, MuxResult};
use debug_panes::multiplexer::MuxClient;
use debug_panes::orchestrator::Orchestrator;

#[derive(Default)]
struct TmuxState {
    calls: Vec<Vec<String>>,
    active: String,
    created: VecDeque<String>,
    index: String,
    window_indexes: HashMap<String, String>,
    failures: HashMap<String, String>,
    sessions: String,
    session_panes: HashMap<String, String>,
}

/// Fake tmux answering by sub-command and recording every invocation.
#[derive(Clone, Default)]
pub struct FakeTmux {
    state: Arc<Mutex<TmuxState>>,
}

impl FakeTmux {
    /// A server whose active pane is `active` (`window:pane:tty`).
    pub fn new(active: &str) -> Self {
        let tmux = Self::default();
        tmux.state.lock().active = active.to_string();
        tmux
    }

    /// Reply for the next `split-window` or `new-session`.
    pub fn queue_pane(&self, reply: &str) {
        self.state.lock().created.push_back(reply.to_string());
    }

    /// Reply for `list-panes`.
    pub fn set_index(&self, reply: &str) {
        self.state.lock().index = reply.to_string();
    }

    /// Reply for `list-panes -t window`.
    pub fn set_window_index(&self, window: &str, reply: &str) {
        self.state.lock().window_indexes.insert(window.to_string(), reply.to_string());
    }

    /// Make every call to sub-command `name` fail with `reason`.
    pub fn fail(&self, name: &str, reason: &str) {
        self.state.lock().failures.insert(name.to_string(), reason.to_string());
    }

    /// Existing session `name` whose pane is `reply`.
    pub fn add_session(&self, name: &str, reply: &str) {
        let mut state = self.state.lock();
        state.sessions.push_str(name);
        state.sessions.push('\n');
        state.session_panes.insert(name.to_string(), reply.to_string());
    }

    /// Every invocation so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.lock().calls.clone()
    }

    /// Invocations of one sub-command.
    pub fn calls_to(&self, name: &str) -> Vec<Vec<String>> {
        self.calls().into_iter().filter(|call| call[0] == name).collect()
    }
}

impl Control for FakeTmux {
    fn invoke(&self, args: &[String]) -> MuxResult<String> {
        let mut state = self.state.lock();
        state.calls.push(args.to_vec());
        if let Some(reason) = state.failures.get(&args[0]) {
            return Err(MuxError::invocation(args, reason.as_str()));
        }
        let target = args.iter().position(|arg| arg == "-t").map(|pos| args[pos + 1].as_str());
        match args[0].as_str() {
            "display-message" => match target {
                Some(session) => state
                    .session_panes
                    .get(session)
                    .cloned()
                    .ok_or_else(|| MuxError::invocation(args, "can't find session")),
                None => Ok(state.active.clone()),
            },
            "split-window" | "new-session" => state
                .created
                .pop_front()
                .ok_or_else(|| MuxError::invocation(args, "no space for new pane")),
            "list-panes" => {
                let window = target.and_then(|window| state.window_indexes.get(window));
                Ok(window.unwrap_or(&state.index).clone())
            },
            "list-sessions" if state.sessions.is_empty() => {
                Err(MuxError::invocation(args, "no server running on /tmp/tmux-0/default"))
            },
            "list-sessions" => Ok(state.sessions.clone()),
            _ => Ok(String::new()),
        }
    }
}

/// Debugger double with canned command output.
#[derive(Clone, Default)]
pub struct FakeDebugger {
    commands: Arc<Mutex<HashMap<String, String>>>,
    processes: Arc<Mutex<HashMap<Vec<String>, String>>>,
    runs: Arc<Mutex<Vec<String>>>,
}

impl FakeDebugger {
    /// Output of debugger command `command`.
    pub fn on_command(&self, command: &str, output: &str) {
        self.commands.lock().insert(command.to_string(), output.to_string());
    }

    /// Output of external process `argv`.
    pub fn on_process(&self, argv: &[&str], output: &str) {
        let argv = argv.iter().map(|s| s.to_string()).collect();
        self.processes.lock().insert(argv, output.to_string());
    }

    /// Commands and processes run so far, in order.
    pub fn runs(&self) -> Vec<String> {
        self.runs.lock().clone()
    }
}

impl Host for FakeDebugger {
    fn execute(&self, command: &str) -> Result<Option<String>, HostError> {
        self.runs.lock().push(command.to_string());
        match self.commands.lock().get(command) {
            Some(output) => Ok(Some(output.clone())),
            None => Err(format!("Undefined command: \"{command}\".").into()),
        }
    }

    fn spawn(&self, argv: &[String], _timeout: Option<Duration>) -> String {
        self.runs.lock().push(format!("!{}", argv.join(" ")));
        self.processes.lock().get(argv).cloned().unwrap_or_default()
    }
}

/// Debugger double that runs external processes for real.
pub struct ProcessDebugger;

impl Host for ProcessDebugger {
    fn execute(&self, _command: &str) -> Result<Option<String>, HostError> {
        Ok(None)
    }
}

/// A regular file standing in for a pane's terminal device.
pub fn device() -> NamedTempFile {
    NamedTempFile::new().expect("temp device")
}

/// `window:pane:tty` reply for a pane backed by `device`.
pub fn reply(window: &str, pane: &str, device: &NamedTempFile) -> String {
    format!("{window}:{pane}:{}", device.path().display())
}

/// Everything written to a stand-in device.
pub fn contents(path: &Path) -> String {
    fs::read_to_string(path).expect("read device")
}

/// Orchestrator attached to `tmux` with the default configuration.
pub fn attach(tmux: &FakeTmux, debugger: &FakeDebugger) -> Orchestrator {
    attach_with(tmux, debugger.clone(), PanesConfig::default())
}

/// Orchestrator attached to `tmux` with `config`.
pub fn attach_with(
    tmux: &FakeTmux,
    host: impl Host + 'static,
    config: PanesConfig,
) -> Orchestrator {
    Orchestrator::attach(MuxClient::new(tmux.clone()), host, config).expect("attach")
}
