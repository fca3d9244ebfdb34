//! Pane registry and refresh engine.
//!
//! The orchestrator owns every pane it created or adopted, in registration
//! order. Debugger lifecycle events drive it: a stop refreshes every bound
//! pane, an exit closes the panes it owns.

use log::{debug, info, warn};

use crate::action::{Action, Host};
use crate::config::{PanesConfig, TitlePolicy};
use crate::control::TmuxControl;
use crate::error::{MuxError, MuxResult};
use crate::layout::Direction;
use crate::multiplexer::MuxClient;
use crate::pane::{Pane, PaneKey};
use crate::split::SizeSpec;

/// Debugger lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Execution stopped (breakpoint, step, signal).
    Stopped,
    /// The debugger is exiting.
    Exited,
}

/// Optional parameters of [`Orchestrator::split`].
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Size of the new pane; the configured default if `None`.
    pub size: Option<SizeSpec>,
    /// Title used for later lookups.
    pub title: Option<String>,
    /// Command run inside the pane instead of the pass-through.
    pub command: Option<Vec<String>>,
    /// Action bound to the new pane.
    pub action: Option<Action>,
}

/// Registry of managed panes.
pub struct Orchestrator {
    mux: MuxClient,
    host: Box<dyn Host>,
    config: PanesConfig,
    panes: Vec<Pane>,
    current: PaneKey,
}

impl Orchestrator {
    /// Attach to the multiplexer, registering the active pane as current.
    ///
    /// The active pane hosts the debugger, so it is adopted: never cleared,
    /// never closed.
    pub fn attach(
        mux: MuxClient,
        host: impl Host + 'static,
        config: PanesConfig,
    ) -> MuxResult<Self> {
        config.default_size()?;
        let pane = Pane::adopted(mux.get_active_pane()?);
        let current = pane.key();
        info!("Attached to pane {current}");
        Ok(Self { mux, host: Box::new(host), config, panes: vec![pane], current })
    }

    /// Attach through the tmux executable and socket named in `config`.
    pub fn connect(host: impl Host + 'static, config: PanesConfig) -> MuxResult<Self> {
        let mux = MuxClient::new(TmuxControl::from_config(&config));
        Self::attach(mux, host, config)
    }

    /// Registered panes in registration order.
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// Look up a registered pane.
    pub fn pane(&self, key: &PaneKey) -> Option<&Pane> {
        self.panes.iter().find(|pane| pane.is(key))
    }

    fn pane_mut(&mut self, key: &PaneKey) -> MuxResult<&mut Pane> {
        self.panes
            .iter_mut()
            .find(|pane| pane.is(key))
            .ok_or_else(|| MuxError::PaneNotFound(key.to_string()))
    }

    /// The implicit default target of splits.
    pub fn current(&self) -> &PaneKey {
        &self.current
    }

    /// Multiplexer client.
    pub fn mux(&self) -> &MuxClient {
        &self.mux
    }

    /// Active configuration.
    pub fn config(&self) -> &PanesConfig {
        &self.config
    }

    /// Add `pane` to the registry, merging into an existing entry with the
    /// same identity.
    fn register(&mut self, pane: Pane) -> PaneKey {
        let key = pane.key();
        match self.panes.iter_mut().find(|existing| existing.is(&key)) {
            Some(existing) => {
                debug!("Pane {key} already registered");
                if pane.action.is_some() {
                    existing.action = pane.action;
                }
                if pane.title.is_some() {
                    existing.title = pane.title;
                }
            },
            None => self.panes.push(pane),
        }
        key
    }

    /// Resolve a pane reference.
    ///
    /// No reference means the multiplexer's active pane, which is adopted if
    /// not yet known. A reference matching a registered title wins over
    /// positional lookup; otherwise it is a display index in `window` (the
    /// active window by default).
    pub fn select(
        &mut self,
        reference: Option<&str>,
        window: Option<&str>,
    ) -> MuxResult<PaneKey> {
        let Some(reference) = reference else {
            let pane = Pane::adopted(self.mux.get_active_pane()?);
            let key = pane.key();
            if self.pane(&key).is_none() {
                info!("Adopting active pane {key}");
                self.panes.push(pane);
            }
            return Ok(key);
        };

        if let Some(key) = self.find_by_title(reference)? {
            return Ok(key);
        }

        let not_found = || MuxError::PaneNotFound(reference.to_string());
        let index: u32 = reference.parse().map_err(|_| not_found())?;
        let window = match window {
            Some(window) => window.to_string(),
            None => self.mux.get_active_pane()?.window,
        };
        let mut index_map = self.mux.get_pane_index(Some(window.as_str()))?;
        let pane = index_map.remove(&index).ok_or_else(not_found)?;
        let key = PaneKey { window, pane };
        match self.pane(&key) {
            Some(_) => Ok(key),
            None => Err(not_found()),
        }
    }

    fn find_by_title(&self, title: &str) -> MuxResult<Option<PaneKey>> {
        let matches: Vec<&Pane> =
            self.panes.iter().filter(|pane| pane.title.as_deref() == Some(title)).collect();
        match (matches.as_slice(), self.config.title_policy) {
            ([], _) => Ok(None),
            ([pane], _) | ([pane, ..], TitlePolicy::First) => Ok(Some(pane.key())),
            (panes, TitlePolicy::Error) => {
                Err(MuxError::AmbiguousTitle { title: title.to_string(), count: panes.len() })
            },
        }
    }

    /// Split `from` (the current pane by default) and register the new pane,
    /// which becomes current.
    pub fn split(
        &mut self,
        direction: Direction,
        from: Option<&PaneKey>,
        options: SplitOptions,
    ) -> MuxResult<PaneKey> {
        let from = from.unwrap_or(&self.current);
        let size = match options.size {
            Some(size) => size,
            None => self.config.default_size()?,
        };
        let source = self.pane(from).ok_or_else(|| MuxError::PaneNotFound(from.to_string()))?;

        let mut pane = source.split(
            &self.mux,
            direction,
            size,
            options.command.as_deref(),
            options.title.as_deref(),
        )?;
        pane.clearing = self.config.clearing;
        pane.action = options.action;

        let key = self.register(pane);
        self.current = key.clone();
        Ok(key)
    }

    /// Find or create the session `name` and register its pane.
    ///
    /// `deletable` applies to created sessions only; an adopted session is
    /// never closed by teardown.
    pub fn session(
        &mut self,
        name: &str,
        action: Option<Action>,
        title: Option<&str>,
        deletable: bool,
    ) -> MuxResult<PaneKey> {
        let mut pane = self.mux.get_or_create_session(name, None, title)?;
        if pane.deletable {
            pane.deletable = deletable;
            pane.clearing = self.config.clearing;
        }
        pane.action = action;
        Ok(self.register(pane))
    }

    /// Bind `action` to a pane and refresh immediately.
    ///
    /// Returns the number of panes written by the refresh pass.
    pub fn set(&mut self, key: &PaneKey, action: Action, clearing: bool) -> MuxResult<usize> {
        let pane = self.pane_mut(key)?;
        debug!("Binding {action} to {key}");
        pane.action = Some(action);
        pane.clearing = clearing;
        Ok(self.update())
    }

    /// Clear a pane's action.
    pub fn unset(&mut self, key: &PaneKey) -> MuxResult<()> {
        self.pane_mut(key)?.action = None;
        Ok(())
    }

    /// Run `action` once and write its output to a pane without binding it.
    ///
    /// Returns the text written.
    pub fn output(&self, key: &PaneKey, action: &Action) -> MuxResult<String> {
        let pane = self.pane(key).ok_or_else(|| MuxError::PaneNotFound(key.to_string()))?;
        let text = action.run(self.host.as_ref(), self.config.action_timeout());
        let text = text.trim_end();
        pane.write(text)?;
        Ok(text.to_string())
    }

    /// Retitle a pane.
    pub fn rename(&mut self, key: &PaneKey, title: &str) -> MuxResult<()> {
        self.pane_mut(key)?.set_title(title)?;
        Ok(())
    }

    /// Close and deregister a pane the orchestrator owns.
    pub fn close(&mut self, key: &PaneKey) -> MuxResult<()> {
        let idx = self
            .panes
            .iter()
            .position(|pane| pane.is(key))
            .ok_or_else(|| MuxError::PaneNotFound(key.to_string()))?;
        if !self.panes[idx].deletable {
            return Err(MuxError::NotOwned(key.to_string()));
        }

        self.panes[idx].close(&self.mux)?;
        self.panes.remove(idx);
        self.reset_current();
        Ok(())
    }

    /// Refresh every bound pane whose device still exists.
    ///
    /// Panes are processed in registration order. Panes without an action or
    /// whose device is gone are skipped, and write failures are logged, so a
    /// pane closed behind our back never aborts the pass. Returns the number
    /// of panes written.
    pub fn update(&self) -> usize {
        let timeout = self.config.action_timeout();
        let mut refreshed = 0;
        for pane in &self.panes {
            let Some(action) = &pane.action else {
                continue;
            };
            if !pane.is_refreshable() {
                debug!("Skipping {}: no live tty", pane.key());
                continue;
            }

            let text = action.run(self.host.as_ref(), timeout);
            match pane.write(text.trim_end()) {
                Ok(()) => refreshed += 1,
                Err(err) => warn!("Failed to refresh pane {}: {err}", pane.key()),
            }
        }
        refreshed
    }

    /// Close and deregister every deletable pane.
    ///
    /// Adopted panes stay registered. A pane that fails to close is still
    /// dropped from the registry. Returns the number of panes removed.
    pub fn teardown(&mut self) -> usize {
        let (owned, kept): (Vec<Pane>, Vec<Pane>) =
            std::mem::take(&mut self.panes).into_iter().partition(|pane| pane.deletable);
        for pane in &owned {
            if let Err(err) = pane.close(&self.mux) {
                warn!("Failed to close pane {}: {err}", pane.key());
            }
        }
        self.panes = kept;
        self.reset_current();
        owned.len()
    }

    /// React to a debugger lifecycle event.
    pub fn handle(&mut self, event: LifecycleEvent) -> usize {
        match event {
            LifecycleEvent::Stopped => self.update(),
            LifecycleEvent::Exited => self.teardown(),
        }
    }

    fn reset_current(&mut self) {
        if self.pane(&self.current).is_none() {
            if let Some(first) = self.panes.first() {
                self.current = first.key();
            }
        }
    }
}
