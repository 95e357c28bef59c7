//! Simulated market data feed for the watchlist.
//!
//! This crate wires together the runtime side of the dashboard:
//!
//! - `repository` — the `InstrumentRepository` boundary and `SimulatedRepository`, which
//!   produces perturbed snapshots after a fixed latency and fails at a fixed rate.
//! - `controller` — `AcquisitionController`, the `Idle → Loading → {Ready | Failed}`
//!   state machine that owns the authoritative snapshot.
//! - `clock` — `ClockService`, one shared tick that drives every elapsed-time label.
//! - `config` — `FeedConfig`, the simulation calibration.
//!
//! Acquisitions and clock ticks are independent: a refresh in progress never pauses the
//! clock and a tick never starts a refresh.
#![warn(missing_docs)]
pub mod clock;
pub mod config;
pub mod controller;
pub mod repository;

pub use clock::{ClockService, Tick};
pub use config::FeedConfig;
pub use controller::{AcquisitionController, AcquisitionState, Phase, TriggerOutcome};
pub use repository::{InstrumentRepository, SimulatedRepository};
