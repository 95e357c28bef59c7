//! Detail session for the currently inspected instrument.
//!
//! A selection and its price series are held in one value and always replaced
//! together, so a series is never shown against the wrong instrument. The series is
//! not cached: selecting the same instrument again generates a new one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use watchlist_common::{Instrument, InstrumentId};

/// Number of points in a detail series.
pub const SERIES_LEN: usize = 30;
/// Largest single step of the random walk, in currency units.
pub const MAX_STEP: f64 = 5.0;
/// Floor applied to every generated price.
pub const MIN_PRICE: f64 = 0.01;

/// One point of the detail series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    /// Minutes before now, e.g. `"29m"`.
    pub offset_label: String,
    /// Simulated price at that offset.
    pub price: f64,
}

/// Random walk of `SERIES_LEN` points starting from `seed_price`, oldest first.
pub fn generate_series<R: Rng + ?Sized>(rng: &mut R, seed_price: f64) -> Vec<SeriesPoint> {
    let mut price = seed_price;
    (0..SERIES_LEN)
        .rev()
        .map(|minutes_ago| {
            price = (price + (rng.random::<f64>() - 0.5) * 2.0 * MAX_STEP).max(MIN_PRICE);
            SeriesPoint {
                offset_label: format!("{}m", minutes_ago),
                price,
            }
        })
        .collect()
}

/// Selected instrument together with its series.
#[derive(Debug, Clone)]
struct Selection {
    instrument: Instrument,
    series: Vec<SeriesPoint>,
}

/// Holds at most one selection.
pub struct DetailSession {
    rng: StdRng,
    current: Option<Selection>,
}

impl DetailSession {
    /// Session seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            current: None,
        }
    }

    /// Session with a reproducible series generator.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            current: None,
        }
    }

    /// Inspect `instrument`, replacing any previous selection and its series.
    pub fn select(&mut self, instrument: Instrument) {
        let series = generate_series(&mut self.rng, instrument.market_price);
        self.current = Some(Selection { instrument, series });
    }

    /// Drop the selection and its series.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The inspected instrument, if any.
    pub fn selected(&self) -> Option<&Instrument> {
        self.current.as_ref().map(|s| &s.instrument)
    }

    /// Series of the current selection; empty when nothing is selected.
    pub fn current_series(&self) -> &[SeriesPoint] {
        self.current.as_ref().map(|s| s.series.as_slice()).unwrap_or(&[])
    }

    /// Re-read the selected instrument from a new snapshot.
    ///
    /// The series stays; it belongs to the selection. If the instrument is gone from
    /// the snapshot the selection is cleared.
    pub fn refresh_from(&mut self, snapshot: &[Instrument]) {
        let Some(selection) = self.current.as_mut() else {
            return;
        };
        let id: InstrumentId = selection.instrument.id;
        match snapshot.iter().find(|i| i.id == id) {
            Some(fresh) => selection.instrument = fresh.clone(),
            None => self.current = None,
        }
    }
}

impl Default for DetailSession {
    fn default() -> Self {
        Self::new()
    }
}
