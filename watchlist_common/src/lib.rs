//!
//! Common types and utilities shared by the watchlist feed and the dashboard client.
//!
//! This crate aggregates:
//! - `error` — unified error type `WatchlistError` used across the workspace.
//! - `result` — handy `Result<T, WatchlistError>` alias.
//! - `instrument` — the `Instrument` row model and the base instrument set.
//! - `view` — search/sort view state and the pure view derivation.
//! - `elapsed` — "time since update" labels.
//! - `format` — currency and percentage display helpers.
#![warn(missing_docs)]
pub mod elapsed;
pub mod error;
pub mod format;
pub mod instrument;
pub mod result;
pub mod view;

pub use error::WatchlistError;
pub use instrument::{Instrument, InstrumentId};
pub use result::Result;
pub use view::{SortDirection, SortKey, ViewState};
