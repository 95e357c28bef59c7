//! Instrument data model and the base instrument set.
//!
//! An `Instrument` is one row of the watchlist: a symbol with its cash-market and
//! futures last traded prices, the day's percentage change and the time the row was
//! last updated. Snapshots of instruments are replaced wholesale on every successful
//! acquisition, never patched field by field.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of an instrument. Never changes across refreshes of the same symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct InstrumentId(pub u32);

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of the day's change, used to classify a row for presentation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Trend {
    /// Zero or positive change.
    Positive,
    /// Negative change.
    Negative,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Positive => f.write_str("positive"),
            Trend::Negative => f.write_str("negative"),
        }
    }
}

/// Market row for a single symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    /// Stable identity within and across snapshots.
    pub id: InstrumentId,
    /// Short uppercase trading symbol.
    pub symbol: String,
    /// Cash-market last traded price.
    pub market_price: f64,
    /// Futures last traded price.
    pub derivative_price: f64,
    /// Signed percentage change for the day.
    pub change_percent: f64,
    /// Time of the last update. Never in the future relative to the acquisition.
    pub updated_at: DateTime<Utc>,
}

impl Instrument {
    /// Create a new instrument row.
    pub fn new(
        id: u32,
        symbol: &str,
        market_price: f64,
        derivative_price: f64,
        change_percent: f64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InstrumentId(id),
            symbol: symbol.to_string(),
            market_price,
            derivative_price,
            change_percent,
            updated_at,
        }
    }

    /// Positive for a zero or rising change, negative otherwise.
    pub fn trend(&self) -> Trend {
        if self.change_percent >= 0.0 {
            Trend::Positive
        } else {
            Trend::Negative
        }
    }
}

/// Symbol, cash price, futures price and percentage change of the base rows, in
/// emission order. Ids are assigned from 1 in this order.
const BASE_ROWS: [(&str, f64, f64, f64); 12] = [
    ("RELIANCE", 2915.45, 2921.10, 0.84),
    ("TCS", 3712.20, 3715.75, -0.45),
    ("HDFC", 2450.80, 2455.25, 1.25),
    ("INFY", 1850.50, 1848.75, -0.32),
    ("SBIN", 550.75, 552.30, 0.68),
    ("ICICI", 920.40, 918.90, -0.16),
    ("WIPRO", 480.30, 481.50, 0.25),
    ("HINDUNILVR", 2550.00, 2558.45, 1.12),
    ("ITC", 420.65, 419.80, -0.20),
    ("AXIS", 980.25, 982.75, 0.51),
    ("KOTAKBANK", 1750.90, 1755.40, 0.86),
    ("BAJFINANCE", 6850.75, 6865.25, 1.45),
];

/// The stable base set every simulated acquisition perturbs.
///
/// All rows carry `updated_at` as their timestamp.
pub fn base_instruments(updated_at: DateTime<Utc>) -> Vec<Instrument> {
    BASE_ROWS
        .iter()
        .enumerate()
        .map(|(idx, (symbol, market, derivative, change))| {
            Instrument::new(idx as u32 + 1, symbol, *market, *derivative, *change, updated_at)
        })
        .collect()
}
