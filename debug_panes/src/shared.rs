//! Orchestrator slot shared between debugger callbacks and commands.
//!
//! Hosts that deliver lifecycle events and user commands on different
//! threads go through this handle; a single mutex covers every registry
//! append, removal and iteration.

use std::sync::Arc;

use log::info;
use parking_lot::Mutex;

use crate::command::{self, Outcome};
use crate::error::MuxResult;
use crate::orchestrator::{LifecycleEvent, Orchestrator};

/// Cloneable handle to the (possibly not yet attached) orchestrator.
#[derive(Clone, Default)]
pub struct SharedOrchestrator {
    slot: Arc<Mutex<Option<Orchestrator>>>,
}

impl SharedOrchestrator {
    /// An empty slot; commands fail until [`SharedOrchestrator::attach`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an attached orchestrator, returning the one it replaces.
    pub fn attach(&self, orchestrator: Orchestrator) -> Option<Orchestrator> {
        self.slot.lock().replace(orchestrator)
    }

    /// Whether an orchestrator is attached.
    pub fn is_attached(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Run one `pane` command line.
    pub fn dispatch(&self, line: &str) -> MuxResult<Outcome> {
        command::dispatch(self.slot.lock().as_mut(), line)
    }

    /// Deliver a lifecycle event.
    ///
    /// An exit tears the orchestrator down and empties the slot. Events
    /// arriving while detached are ignored.
    pub fn handle(&self, event: LifecycleEvent) -> usize {
        let mut slot = self.slot.lock();
        match event {
            LifecycleEvent::Stopped => slot.as_ref().map_or(0, Orchestrator::update),
            LifecycleEvent::Exited => match slot.take() {
                Some(mut orchestrator) => {
                    let closed = orchestrator.teardown();
                    info!("Debugger exited, closed {closed} panes");
                    closed
                },
                None => 0,
            },
        }
    }

    /// Run `f` with exclusive access to the attached orchestrator.
    pub fn with<R>(&self, f: impl FnOnce(&mut Orchestrator) -> R) -> Option<R> {
        self.slot.lock().as_mut().map(f)
    }
}
