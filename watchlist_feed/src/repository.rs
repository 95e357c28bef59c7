//! Instrument repository and its simulated implementation.
//!
//! `InstrumentRepository` is the boundary the acquisition controller calls. The only
//! implementation shipped here, `SimulatedRepository`, stands in for a remote feed: it
//! waits a fixed latency, fails at a fixed probability, and otherwise returns the whole
//! base set with randomly perturbed prices and timestamps.
//!
//! Perturbations never compound: every call starts from the same base set, so the
//! values of one call are independent of the previous one and stay within a bounded
//! band around the base values.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use watchlist_common::instrument::base_instruments;
use watchlist_common::{Instrument, Result, WatchlistError};

use crate::config::FeedConfig;

/// Message carried by a simulated acquisition failure.
pub const FAILURE_MESSAGE: &str = "Failed to fetch data";

/// Source of full instrument snapshots.
#[async_trait]
pub trait InstrumentRepository: Send + Sync {
    /// Fetch every known instrument, all or nothing.
    async fn acquire(&self) -> Result<Vec<Instrument>>;
}

/// In-process stand-in for a remote market data feed.
pub struct SimulatedRepository {
    base: Vec<Instrument>,
    config: FeedConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedRepository {
    /// Repository over the stock twelve-instrument base set.
    pub fn new(config: FeedConfig) -> Self {
        Self::with_base(base_instruments(Utc::now()), config)
    }

    /// Repository over a caller-provided base set, emitted in the given order.
    pub fn with_base(base: Vec<Instrument>, config: FeedConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            base,
            config,
            rng: Mutex::new(rng),
        }
    }

    /// The unperturbed rows every acquisition starts from.
    pub fn base(&self) -> &[Instrument] {
        &self.base
    }

    /// Decide the outcome of one acquisition completing at `now`.
    pub fn settle(&self, now: DateTime<Utc>) -> Result<Vec<Instrument>> {
        let mut rng = self.rng.lock()?;

        if rng.random::<f64>() < self.config.failure_rate {
            warn!("Simulated feed failure");
            return Err(WatchlistError::AcquisitionFailure(FAILURE_MESSAGE.to_string()));
        }

        let window_ms = i64::try_from(self.config.staleness_window.as_millis()).map_err(|_| {
            WatchlistError::InvalidConfig(format!(
                "staleness window {:?} out of range",
                self.config.staleness_window
            ))
        })?;
        let rows: Vec<Instrument> = self
            .base
            .iter()
            .map(|row| {
                let stale_ms = if window_ms > 0 {
                    rng.random_range(0..window_ms)
                } else {
                    0
                };
                Instrument {
                    id: row.id,
                    symbol: row.symbol.clone(),
                    market_price: next_price(&mut *rng, row.market_price, self.config.price_jitter),
                    derivative_price: next_price(
                        &mut *rng,
                        row.derivative_price,
                        self.config.price_jitter,
                    ),
                    change_percent: round2(
                        row.change_percent + symmetric(&mut *rng, self.config.change_jitter),
                    ),
                    updated_at: now - TimeDelta::milliseconds(stale_ms),
                }
            })
            .collect();

        debug!("Simulated feed produced {} instruments", rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl InstrumentRepository for SimulatedRepository {
    async fn acquire(&self) -> Result<Vec<Instrument>> {
        tokio::time::sleep(self.config.latency).await;
        self.settle(Utc::now())
    }
}

/// Scale `price` by a uniform factor in `[1 - jitter, 1 + jitter)`, rounded to cents.
///
/// The result is clamped so a price never turns negative.
pub fn next_price<R: Rng + ?Sized>(rng: &mut R, price: f64, jitter: f64) -> f64 {
    round2(price * (1.0 + symmetric(rng, jitter))).max(0.0)
}

/// Uniform sample from `[-half_width, half_width)`.
fn symmetric<R: Rng + ?Sized>(rng: &mut R, half_width: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * 2.0 * half_width
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
