//! Application-level orchestration.
//!
//! This module owns the session state machine, the interactive frame loop,
//! headless scripted runs and post-session processing such as exports.
//! UI/CLI layers call into this module to keep responsibilities separated.

mod controller;
mod post_process;
mod session;
mod simulate;

pub(crate) use controller::{run_controller, UiCommand};
pub(crate) use post_process::process_session_completion;
pub(crate) use simulate::{run_simulation, SimulationScript};
