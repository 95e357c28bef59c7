//! Command-line arguments for the Watchlist Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::time::Duration;

use clap::Parser;
use watchlist_common::{Result, SortDirection, SortKey, ViewState};
use watchlist_feed::FeedConfig;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Initial search text, matched case-insensitively against symbols.
    #[clap(long, default_value = "")]
    pub search: String,

    /// Initial sort key.
    #[clap(long, value_enum, default_value_t = SortKey::None)]
    pub sort_by: SortKey,

    /// Initial sort direction.
    #[clap(long, value_enum, default_value_t = SortDirection::Ascending)]
    pub order: SortDirection,

    /// Probability in [0, 1] that a simulated fetch fails. Overrides WATCHLIST_FAILURE_RATE.
    #[clap(long)]
    pub failure_rate: Option<f64>,

    /// Simulated fetch latency in milliseconds. Overrides WATCHLIST_LATENCY_MS.
    #[clap(long)]
    pub latency_ms: Option<u64>,

    /// Clock period in milliseconds for the "updated ... ago" labels.
    #[clap(long, default_value_t = 1_000)]
    pub tick_ms: u64,

    /// Seed for reproducible runs. Overrides WATCHLIST_SEED.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Print rows as JSON lines instead of the text board.
    #[clap(long)]
    pub json: bool,

    /// Re-print the board on every clock tick.
    #[clap(long)]
    pub live: bool,
}

impl Args {
    /// Feed calibration: defaults, then environment, then flags.
    pub fn feed_config(&self) -> Result<FeedConfig> {
        let mut cfg = FeedConfig::from_env()?;
        if let Some(rate) = self.failure_rate {
            cfg.failure_rate = rate;
        }
        if let Some(ms) = self.latency_ms {
            cfg.latency = Duration::from_millis(ms);
        }
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        cfg.validate()
    }

    /// Initial view state.
    pub fn view_state(&self) -> ViewState {
        ViewState::new(&self.search, self.sort_by, self.order)
    }

    /// Clock period, never shorter than 10 ms.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}
