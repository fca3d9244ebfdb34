//! Reply formats exchanged with the multiplexer's control interface.
//!
//! Every pane-producing command is asked to print a single
//! `window_id:pane_id:pane_tty` line, index queries print one
//! `pane_index:pane_id` pair per line. A reply with the wrong number of
//! fields is rejected rather than truncated.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{MuxError, MuxResult};

/// Format string producing a [`PaneCoords`] reply.
pub const PANE_FORMAT: &str = "#{window_id}:#{pane_id}:#{pane_tty}";

/// Format string producing one [`parse_pane_index`] line per pane.
pub const INDEX_FORMAT: &str = "#{pane_index}:#{pane_id}";

/// Format string producing one session name per line.
pub const SESSION_FORMAT: &str = "#{session_name}";

const FIELD_DELIM: char = ':';

/// Live multiplexer coordinates of a pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneCoords {
    /// Window identifier, e.g. `@1`.
    pub window: String,
    /// Pane identifier, e.g. `%9`.
    pub pane: String,
    /// Terminal device backing the pane, absent if the multiplexer reported none.
    pub tty: Option<PathBuf>,
}

/// Parse a `window_id:pane_id:pane_tty` reply.
pub fn parse_pane_coords(args: &[String], reply: &str) -> MuxResult<PaneCoords> {
    let line = reply.trim();
    let fields: Vec<&str> = line.split(FIELD_DELIM).collect();
    let [window, pane, tty] = fields.as_slice() else {
        return Err(MuxError::invocation(
            args,
            format!("expected 3 fields in reply, got {}: {line:?}", fields.len()),
        ));
    };
    if window.is_empty() || pane.is_empty() {
        return Err(MuxError::invocation(args, format!("incomplete pane reply: {line:?}")));
    }

    Ok(PaneCoords {
        window: window.to_string(),
        pane: pane.to_string(),
        tty: (!tty.is_empty()).then(|| PathBuf::from(*tty)),
    })
}

/// Parse `pane_index:pane_id` lines into a display-index map.
pub fn parse_pane_index(args: &[String], reply: &str) -> MuxResult<BTreeMap<u32, String>> {
    let mut panes = BTreeMap::new();
    for line in reply.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let fields: Vec<&str> = line.split(FIELD_DELIM).collect();
        let [index, pane] = fields.as_slice() else {
            return Err(MuxError::invocation(
                args,
                format!("expected 2 fields in index line, got {}: {line:?}", fields.len()),
            ));
        };
        let index = index
            .parse::<u32>()
            .map_err(|err| MuxError::invocation(args, format!("bad pane index {index:?}: {err}")))?;
        panes.insert(index, pane.to_string());
    }
    Ok(panes)
}

/// Parse a `list-sessions` reply into session names.
pub fn parse_session_names(reply: &str) -> Vec<String> {
    reply.lines().map(str::trim).filter(|name| !name.is_empty()).map(String::from).collect()
}

/// Whether a control error means "nothing to list" rather than a failure.
pub fn is_empty_server_error(reason: &str) -> bool {
    let normalized = reason.to_ascii_lowercase();
    normalized.contains("no server running")
        || normalized.contains("no sessions")
        || normalized.contains("error connecting to")
}
