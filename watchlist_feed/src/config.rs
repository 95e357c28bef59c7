//! Calibration of the simulated feed.
//!
//! Latency, failure probability and perturbation bounds are simulation knobs, so they
//! live here instead of being baked into the repository. `FeedConfig::default()` carries
//! the stock calibration; `from_env` lets a deployment override it.

use std::env;
use std::time::Duration;

use log::debug;
use watchlist_common::{Result, WatchlistError};

/// Environment variable overriding [`FeedConfig::latency`], in milliseconds.
pub const LATENCY_ENV: &str = "WATCHLIST_LATENCY_MS";
/// Environment variable overriding [`FeedConfig::failure_rate`].
pub const FAILURE_RATE_ENV: &str = "WATCHLIST_FAILURE_RATE";
/// Environment variable overriding [`FeedConfig::seed`].
pub const SEED_ENV: &str = "WATCHLIST_SEED";
/// Largest accepted [`FeedConfig::staleness_window`].
pub const MAX_STALENESS_WINDOW: Duration = Duration::from_secs(300);

/// Simulated feed parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedConfig {
    /// Delay before every acquisition settles.
    pub latency: Duration,

    /// Probability in `[0, 1]` that an acquisition fails.
    pub failure_rate: f64,

    /// Upper bound of how far `updated_at` may be backdated.
    pub staleness_window: Duration,

    /// Half-width of the relative price perturbation (0.01 = ±1%).
    pub price_jitter: f64,

    /// Half-width of the absolute perturbation applied to the percentage change.
    pub change_jitter: f64,

    /// Seed for deterministic runs. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1_000),
            failure_rate: 0.1,
            staleness_window: MAX_STALENESS_WINDOW,
            price_jitter: 0.01,
            change_jitter: 0.25,
            seed: None,
        }
    }
}

impl FeedConfig {
    /// Default calibration overlaid with any `WATCHLIST_*` environment values.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(raw) = env::var(LATENCY_ENV) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|e| WatchlistError::InvalidConfig(format!("{}={}: {}", LATENCY_ENV, raw, e)))?;
            cfg.latency = Duration::from_millis(ms);
        }
        if let Ok(raw) = env::var(FAILURE_RATE_ENV) {
            cfg.failure_rate = raw.trim().parse().map_err(|e| {
                WatchlistError::InvalidConfig(format!("{}={}: {}", FAILURE_RATE_ENV, raw, e))
            })?;
        }
        if let Ok(raw) = env::var(SEED_ENV) {
            let seed: u64 = raw
                .trim()
                .parse()
                .map_err(|e| WatchlistError::InvalidConfig(format!("{}={}: {}", SEED_ENV, raw, e)))?;
            cfg.seed = Some(seed);
        }

        debug!("feed config loaded: {:?}", cfg);
        cfg.validate()
    }

    /// Builder-style override of the latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Builder-style override of the failure probability.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    /// Builder-style override of the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values the simulation cannot honour.
    pub fn validate(self) -> Result<Self> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(WatchlistError::InvalidConfig(format!(
                "failure rate must be within [0, 1], got {}",
                self.failure_rate
            )));
        }
        if self.staleness_window > MAX_STALENESS_WINDOW {
            return Err(WatchlistError::InvalidConfig(format!(
                "staleness window must be at most {:?}, got {:?}",
                MAX_STALENESS_WINDOW, self.staleness_window
            )));
        }
        if !(0.0..1.0).contains(&self.price_jitter) {
            return Err(WatchlistError::InvalidConfig(format!(
                "price jitter must be within [0, 1), got {}",
                self.price_jitter
            )));
        }
        if self.change_jitter.is_nan() || self.change_jitter < 0.0 {
            return Err(WatchlistError::InvalidConfig(format!(
                "change jitter must be non-negative, got {}",
                self.change_jitter
            )));
        }
        Ok(self)
    }
}
