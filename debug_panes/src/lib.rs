//! Debugger-driven tmux pane orchestration.
//!
//! Lets a debugging session split tmux panes, bind each one to a debugger
//! command or external process, and refresh their content every time the
//! debugger stops. Panes created by the session are closed when the debugger
//! exits. The debugger itself is reached through the [`action::Host`] trait
//! and tmux through [`control::Control`], so both can be replaced in tests.

pub mod action;
pub mod cli;
pub mod command;
pub mod config;
pub mod control;
pub mod error;
pub mod layout;
pub mod multiplexer;
pub mod orchestrator;
pub mod pane;
pub mod process;
pub mod protocol;
pub mod shared;
pub mod split;
