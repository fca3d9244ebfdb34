//! External process execution with merged output.

use std::convert::Infallible;
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use parking_lot::Mutex;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long output is still collected after a timed-out process was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Run `argv` to completion and return its stdout and stderr as one text.
///
/// The exit status is ignored: whatever the process printed is the result.
/// Spawn failures and timeouts are reported in the returned text instead of
/// as errors. With a `timeout`, the process and everything it started are
/// killed once it expires, and the output gathered so far is kept.
pub fn run_merged(argv: &[String], timeout: Option<Duration>) -> String {
    let Some(program) = argv.first() else {
        return String::new();
    };

    let mut child = match merged_command(argv)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(stderr_pipe())
        .spawn()
    {
        Ok(child) => child,
        Err(err) => return format!("failed to run {program}: {err}\n"),
    };

    let output = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = mpsc::channel();
    if let Some(stdout) = child.stdout.take() {
        drain(stdout, program, &output, done_tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        drain(stderr, program, &output, done_tx.clone());
    }
    drop(done_tx);

    let deadline = timeout.map(|limit| Instant::now() + limit);
    let waited = match deadline {
        Some(deadline) => wait_until(&mut child, deadline),
        None => child.wait().map(|_| true),
    };
    let mut timed_out = matches!(waited, Ok(false));

    // Descendants may outlive the child and keep the pipe open.
    let drain_until = if timed_out { Some(Instant::now() + DRAIN_GRACE) } else { deadline };
    if !readers_finished(&done_rx, drain_until) {
        timed_out = true;
        if let Err(err) = kill_tree(&mut child) {
            warn!("Failed to kill {program}: {err}");
        }
        if !readers_finished(&done_rx, Some(Instant::now() + DRAIN_GRACE)) {
            warn!("Abandoning output of {program}: pipe still open");
        }
    }

    let output = std::mem::take(&mut *output.lock());
    let mut text = String::from_utf8_lossy(&output).into_owned();
    match waited {
        Err(err) => {
            warn!("Failed to wait for {program}: {err}");
            text.push_str(&format!("\n[failed to wait for {program}: {err}]\n"));
        },
        Ok(_) if timed_out => {
            let limit = timeout.unwrap_or_default();
            warn!("{program} killed after {limit:?}");
            text.push_str(&format!("\n[{program} timed out after {}ms]\n", limit.as_millis()));
        },
        Ok(_) => debug!("{program} produced {} bytes", output.len()),
    }
    text
}

/// Copy `pipe` into `sink` on a background thread.
///
/// `done` is dropped when the pipe closes, which is how the caller learns
/// that every reader has finished.
fn drain(
    mut pipe: impl Read + Send + 'static,
    program: &str,
    sink: &Arc<Mutex<Vec<u8>>>,
    done: Sender<Infallible>,
) {
    let program = program.to_string();
    let sink = Arc::clone(sink);
    thread::spawn(move || {
        let _done = done;
        let mut chunk = [0u8; 4096];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => sink.lock().extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!("Failed to read output of {program}: {err}");
                    break;
                },
            }
        }
    });
}

/// Wait until every reader has dropped its sender, or `until` passes.
fn readers_finished(done: &Receiver<Infallible>, until: Option<Instant>) -> bool {
    match until {
        None => done.recv().is_err(),
        Some(until) => {
            let left = until.saturating_duration_since(Instant::now());
            matches!(done.recv_timeout(left), Err(RecvTimeoutError::Disconnected))
        },
    }
}

/// Wait for `child`, killing it and its descendants once `deadline` passes.
///
/// Returns `Ok(false)` if the child had to be killed.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<bool> {
    loop {
        if child.try_wait()?.is_some() {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            kill_tree(child)?;
            child.wait()?;
            return Ok(false);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Command running `argv` with stderr redirected into stdout.
///
/// The arguments are handed to the shell as positional parameters, so they
/// are never re-parsed. The process leads its own group so a timeout can
/// reach everything it spawns.
#[cfg(unix)]
fn merged_command(argv: &[String]) -> Command {
    use std::os::unix::process::CommandExt;

    let mut command = Command::new("sh");
    command.args(["-c", "exec \"$@\" 2>&1", "sh"]).args(argv).process_group(0);
    command
}

/// The shell already merges stderr into stdout.
#[cfg(unix)]
fn stderr_pipe() -> Stdio {
    Stdio::null()
}

/// Kill the process group led by `child`.
#[cfg(unix)]
fn kill_tree(child: &mut Child) -> io::Result<()> {
    let pgid = libc::pid_t::try_from(child.id()).map_err(io::Error::other)?;
    // SAFETY: killpg only sends a signal and has no memory effects.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Ok(()),
        _ => Err(err),
    }
}

#[cfg(not(unix))]
fn merged_command(argv: &[String]) -> Command {
    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);
    command
}

/// Without a shell to merge the streams, stderr gets its own reader feeding
/// the same buffer.
#[cfg(not(unix))]
fn stderr_pipe() -> Stdio {
    Stdio::piped()
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) -> io::Result<()> {
    child.kill()
}
