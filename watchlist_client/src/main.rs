//! Watchlist Client — a terminal dashboard over the simulated market feed.
//!
//! The client mounts the dashboard by triggering the first acquisition, then
//! multiplexes four independent event sources in one loop:
//!
//! - controller state transitions (a snapshot arrived or a fetch failed),
//! - clock ticks driving the "updated ... ago" labels,
//! - interactive commands typed on stdin,
//! - Ctrl+C.
//!
//! Acquisitions run on a background task so the clock keeps ticking while a refresh is
//! in flight. Refreshing is always user-initiated; a failed fetch is retried with
//! `retry`.
//!
//! Usage example (CLI):
//! ```bash
//! watchlist_client --sort-by change --order desc --failure-rate 0.1 --latency-ms 1000
//! ```
#![warn(missing_docs)]
mod args;
mod model;
mod render;

use std::sync::Arc;

use crate::args::Args;
use crate::model::command::{DashboardCommand, HELP};
use crate::model::dashboard::{Dashboard, Effect};
use crate::model::detail::DetailSession;
use clap::Parser;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use watchlist_common::{Result, WatchlistError};
use watchlist_feed::{AcquisitionController, ClockService, SimulatedRepository, Tick};

type Controller = AcquisitionController<SimulatedRepository>;

/// Print the board, and the detail view when an instrument is selected.
fn print_board(controller: &Controller, dashboard: &Dashboard, tick: Tick, json: bool) -> Result<()> {
    let state = controller.state();
    let rows = dashboard.visible(state.rows());

    if json {
        for line in render::render_json(&rows, tick.now)? {
            println!("{}", line);
        }
        return Ok(());
    }

    for line in render::render_board(&state, &rows, tick.now, dashboard.mode) {
        println!("{}", line);
    }
    if let Some(instrument) = dashboard.detail.selected() {
        let series = dashboard.detail.current_series();
        for line in render::render_detail(instrument, series, tick.now) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Parse and apply one stdin line. Returns `false` when the user asked to quit.
fn handle_line(
    line: &str,
    controller: &Controller,
    dashboard: &mut Dashboard,
    clock: &ClockService,
    json: bool,
) -> Result<bool> {
    if line.trim().is_empty() {
        return Ok(true);
    }
    let command: DashboardCommand = line.parse()?;
    let snapshot = controller.snapshot();

    match dashboard.apply(command, &snapshot)? {
        Effect::Refresh => {
            if controller.spawn_trigger().is_none() {
                info!("Refresh already in progress");
            }
        }
        Effect::Render => print_board(controller, dashboard, clock.now(), json)?,
        Effect::Help => println!("{}", HELP),
        Effect::Quit => return Ok(false),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), WatchlistError> {
    init_logger();
    let args = Args::parse();
    let config = args.feed_config()?;
    info!(
        "Feed calibration: latency={:?} failure_rate={}",
        config.latency, config.failure_rate
    );

    let detail = match args.seed {
        Some(seed) => DetailSession::with_seed(seed),
        None => DetailSession::new(),
    };
    let mut dashboard = Dashboard::new(args.view_state(), detail);

    let controller: Controller = AcquisitionController::new(Arc::new(SimulatedRepository::new(config)));
    let mut states = controller.subscribe();

    let clock = ClockService::start(args.tick_period());
    let mut ticks = clock.subscribe();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    println!("{}", HELP);
    controller.spawn_trigger();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Ctrl+C received. Shutting down dashboard...");
                break;
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                dashboard.detail.refresh_from(state.rows());
                print_board(&controller, &dashboard, clock.now(), args.json)?;
            }
            changed = ticks.changed() => {
                if changed.is_err() {
                    warn!("Clock stopped");
                    break;
                }
                let tick = *ticks.borrow_and_update();
                if args.live {
                    print_board(&controller, &dashboard, tick, args.json)?;
                } else {
                    debug!("Clock tick {}", tick.seq);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                match handle_line(&line, &controller, &mut dashboard, &clock, args.json) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => warn!("{}", e),
                }
            }
        }
    }

    clock.stop();
    info!("Dashboard stopped");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
