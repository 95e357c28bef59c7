//! Dashboard state owned by the client.
//!
//! - `command` — interactive commands typed on stdin.
//! - `detail` — the detail session for the currently inspected instrument.
//! - `dashboard` — view state, view mode and detail session, updated by commands.
pub mod command;
pub mod dashboard;
pub mod detail;
