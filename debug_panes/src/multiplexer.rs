//! Stateless façade over the multiplexer's control interface.
//!
//! Each method issues one (occasionally two) control commands and turns the
//! reply into typed coordinates. Nothing is cached between calls: the
//! multiplexer may renumber or close panes behind our back at any time.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::control::Control;
use crate::error::{MuxError, MuxResult};
use crate::layout::Direction;
use crate::pane::Pane;
use crate::protocol::{
    self, INDEX_FORMAT, PANE_FORMAT, PaneCoords, SESSION_FORMAT, is_empty_server_error,
};
use crate::split::{self, SizeSpec};

/// Typed client for the multiplexer.
pub struct MuxClient {
    control: Box<dyn Control>,
}

impl MuxClient {
    /// Wrap a control interface.
    pub fn new(control: impl Control + 'static) -> Self {
        Self { control: Box::new(control) }
    }

    fn run<I, S>(&self, args: I) -> MuxResult<(Vec<String>, String)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let reply = self.control.invoke(&args)?;
        Ok((args, reply))
    }

    /// Split `target`, returning the new pane's coordinates.
    ///
    /// Without a `command` the pane runs a pass-through `cat -`. A `title`
    /// is applied with a follow-up `select-pane -T`; the pane exists by then,
    /// so a failure there is only logged.
    pub fn split_pane(
        &self,
        target: &str,
        direction: Direction,
        size: SizeSpec,
        command: Option<&[String]>,
        title: Option<&str>,
    ) -> MuxResult<PaneCoords> {
        let (args, reply) = self.run(split::split_args(target, direction, size, command))?;
        let coords = protocol::parse_pane_coords(&args, &reply)?;
        debug!("Split {target} {direction} ({size}) -> {}:{}", coords.window, coords.pane);

        if let Some(title) = title {
            if let Err(err) = self.run(["select-pane", "-t", coords.pane.as_str(), "-T", title]) {
                warn!("Failed to title pane {}: {err}", coords.pane);
            }
        }
        Ok(coords)
    }

    /// Names of the sessions currently known to the multiplexer.
    ///
    /// A server with no sessions (or no server at all) yields an empty list.
    pub fn list_sessions(&self) -> MuxResult<Vec<String>> {
        match self.run(["list-sessions", "-F", SESSION_FORMAT]) {
            Ok((_, reply)) => Ok(protocol::parse_session_names(&reply)),
            Err(MuxError::Invocation { reason, .. }) if is_empty_server_error(&reason) => {
                Ok(Vec::new())
            },
            Err(err) => Err(err),
        }
    }

    /// Find the session called `name`, or create it.
    ///
    /// An existing session is adopted: the returned pane is clearable but not
    /// deletable. A created session is deletable.
    pub fn get_or_create_session(
        &self,
        name: &str,
        command: Option<&[String]>,
        title: Option<&str>,
    ) -> MuxResult<Pane> {
        if self.list_sessions()?.iter().any(|session| session == name) {
            let (args, reply) = self.run(["display-message", "-p", "-t", name, "-F", PANE_FORMAT])?;
            let coords = protocol::parse_pane_coords(&args, &reply)?;
            info!("Adopting existing session {name} ({}:{})", coords.window, coords.pane);
            let mut pane = Pane::new(coords);
            pane.deletable = false;
            pane.title = title.map(String::from);
            return Ok(pane);
        }

        let mut args: Vec<String> = ["new-session", "-d", "-P", "-F", PANE_FORMAT, "-s", name]
            .into_iter()
            .map(String::from)
            .collect();
        if let Some(title) = title {
            args.push("-n".into());
            args.push(title.into());
        }
        match command {
            Some(command) if !command.is_empty() => args.extend(command.iter().cloned()),
            _ => args.extend(split::PASSTHROUGH_COMMAND.iter().map(|s| s.to_string())),
        }

        let (args, reply) = self.run(args)?;
        let coords = protocol::parse_pane_coords(&args, &reply)?;
        info!("Created session {name} ({}:{})", coords.window, coords.pane);
        let mut pane = Pane::new(coords);
        pane.title = title.map(String::from);
        Ok(pane)
    }

    /// Kill a pane.
    pub fn close_pane(&self, pane_id: &str) -> MuxResult<()> {
        self.run(["kill-pane", "-t", pane_id])?;
        Ok(())
    }

    /// Flash the multiplexer's pane-number overlay.
    pub fn show_all_panes(&self) {
        if let Err(err) = self.run(["display-panes"]) {
            warn!("Failed to show pane overlay: {err}");
        }
    }

    /// Coordinates of the currently active pane.
    pub fn get_active_pane(&self) -> MuxResult<PaneCoords> {
        let (args, reply) = self.run(["display-message", "-p", "-F", PANE_FORMAT])?;
        protocol::parse_pane_coords(&args, &reply)
    }

    /// Map of display index to pane id for `window` (the active window if `None`).
    pub fn get_pane_index(&self, window: Option<&str>) -> MuxResult<BTreeMap<u32, String>> {
        let mut args: Vec<String> = vec!["list-panes".into()];
        if let Some(window) = window {
            args.push("-t".into());
            args.push(window.into());
        }
        args.push("-F".into());
        args.push(INDEX_FORMAT.into());
        let (args, reply) = self.run(args)?;
        protocol::parse_pane_index(&args, &reply)
    }
}
