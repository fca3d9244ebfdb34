//! Managed pane state.
//!
//! A pane is identified by its multiplexer window and pane ids, and is
//! written to through its terminal device. Layout operations are delegated to
//! [`MuxClient`]; the pane itself only tracks metadata.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use log::{debug, info};

use crate::action::Action;
use crate::error::MuxResult;
use crate::layout::Direction;
use crate::multiplexer::MuxClient;
use crate::protocol::PaneCoords;
use crate::split::SizeSpec;

/// Homes the cursor and clears the screen.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Registry identity of a pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaneKey {
    /// Window identifier, e.g. `@1`.
    pub window: String,
    /// Pane identifier, e.g. `%9`.
    pub pane: String,
}

impl fmt::Display for PaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.window, self.pane)
    }
}

/// OSC 2 sequence setting the terminal title.
pub fn title_sequence(title: &str) -> String {
    format!("\x1b]2;{title}\x1b\\")
}

/// A pane managed by the orchestrator.
#[derive(Debug, Clone)]
pub struct Pane {
    /// Window identifier.
    pub window: String,
    /// Pane identifier.
    pub pane: String,
    /// Terminal device, if the multiplexer reported one.
    pub tty: Option<PathBuf>,
    /// Label used to refer to the pane independently of its position.
    pub title: Option<String>,
    /// Clear the screen before each write.
    pub clearing: bool,
    /// Whether teardown may close this pane.
    pub deletable: bool,
    /// Action refreshing the pane's content.
    pub action: Option<Action>,
}

impl Pane {
    /// A freshly created pane: deletable, clearing, unbound.
    pub fn new(coords: PaneCoords) -> Self {
        Self {
            window: coords.window,
            pane: coords.pane,
            tty: coords.tty,
            title: None,
            clearing: true,
            deletable: true,
            action: None,
        }
    }

    /// A pane that existed before the orchestrator touched it.
    ///
    /// Adopted panes are never closed by teardown and never cleared, since
    /// they typically host the debugger's own prompt.
    pub fn adopted(coords: PaneCoords) -> Self {
        Self { clearing: false, deletable: false, ..Self::new(coords) }
    }

    /// Registry identity.
    pub fn key(&self) -> PaneKey {
        PaneKey { window: self.window.clone(), pane: self.pane.clone() }
    }

    /// Whether this pane has identity `key`.
    pub fn is(&self, key: &PaneKey) -> bool {
        self.window == key.window && self.pane == key.pane
    }

    /// Whether the next refresh pass would write to this pane.
    pub fn is_refreshable(&self) -> bool {
        self.action.is_some() && self.tty.as_ref().is_some_and(|tty| tty.exists())
    }

    /// Split this pane, returning the new one.
    pub fn split(
        &self,
        mux: &MuxClient,
        direction: Direction,
        size: SizeSpec,
        command: Option<&[String]>,
        title: Option<&str>,
    ) -> MuxResult<Pane> {
        let coords = mux.split_pane(&self.pane, direction, size, command, title)?;
        info!("Split {} {direction}: new pane {}:{}", self.pane, coords.window, coords.pane);
        let mut pane = Pane::new(coords);
        pane.title = title.map(String::from);
        Ok(pane)
    }

    /// Split above this pane.
    pub fn above(&self, mux: &MuxClient, size: SizeSpec, title: Option<&str>) -> MuxResult<Pane> {
        self.split(mux, Direction::Above, size, None, title)
    }

    /// Split below this pane.
    pub fn below(&self, mux: &MuxClient, size: SizeSpec, title: Option<&str>) -> MuxResult<Pane> {
        self.split(mux, Direction::Below, size, None, title)
    }

    /// Split left of this pane.
    pub fn left(&self, mux: &MuxClient, size: SizeSpec, title: Option<&str>) -> MuxResult<Pane> {
        self.split(mux, Direction::Left, size, None, title)
    }

    /// Split right of this pane.
    pub fn right(&self, mux: &MuxClient, size: SizeSpec, title: Option<&str>) -> MuxResult<Pane> {
        self.split(mux, Direction::Right, size, None, title)
    }

    /// Write `text` verbatim to the pane's device, clearing first if enabled.
    ///
    /// Without a device this is a no-op. The device is never created.
    pub fn write(&self, text: &str) -> io::Result<()> {
        let Some(tty) = &self.tty else {
            return Ok(());
        };

        let mut buf = Vec::with_capacity(CLEAR_SCREEN.len() + text.len());
        if self.clearing {
            buf.extend_from_slice(CLEAR_SCREEN.as_bytes());
        }
        buf.extend_from_slice(text.as_bytes());

        let mut device = OpenOptions::new().write(true).open(tty)?;
        device.write_all(&buf)?;
        device.flush()
    }

    /// Set the pane's terminal title and remember it for lookups.
    pub fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.title = Some(title.to_string());
        let Some(tty) = &self.tty else {
            return Ok(());
        };
        debug!("Setting title of {} to {title:?}", self.pane);
        let mut device = OpenOptions::new().write(true).open(tty)?;
        device.write_all(title_sequence(title).as_bytes())?;
        device.flush()
    }

    /// Kill the pane in the multiplexer.
    pub fn close(&self, mux: &MuxClient) -> MuxResult<()> {
        info!("Closing pane {}:{}", self.window, self.pane);
        mux.close_pane(&self.pane)
    }
}
