//! Text and JSON rendering of the board.
//!
//! Every function here is pure: it takes the controller state, the derived rows and
//! the latest clock reading, and returns lines to print.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use watchlist_common::elapsed::label_for;
use watchlist_common::format::{format_currency, format_percentage};
use watchlist_common::instrument::Trend;
use watchlist_common::{Instrument, Result};
use watchlist_feed::{AcquisitionState, Phase};

use crate::model::dashboard::ViewMode;
use crate::model::detail::SeriesPoint;

/// Placeholder rows shown while the first snapshot loads.
pub const SKELETON_ROWS: usize = 12;

/// One row as emitted in `--json` mode.
#[derive(Debug, Serialize)]
pub struct RowView<'a> {
    /// Stable id.
    pub id: u32,
    /// Symbol.
    pub symbol: &'a str,
    /// Cash-market price.
    pub market_price: f64,
    /// Futures price.
    pub derivative_price: f64,
    /// Percentage change.
    pub change_percent: f64,
    /// `positive` or `negative`.
    pub trend: String,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Elapsed-time label at render time.
    pub updated: String,
}

impl<'a> RowView<'a> {
    fn new(instrument: &'a Instrument, now: DateTime<Utc>) -> Self {
        Self {
            id: instrument.id.0,
            symbol: &instrument.symbol,
            market_price: instrument.market_price,
            derivative_price: instrument.derivative_price,
            change_percent: instrument.change_percent,
            trend: instrument.trend().to_string(),
            updated_at: instrument.updated_at,
            updated: label_for(instrument.updated_at, now),
        }
    }
}

/// Single text row.
pub fn render_row(instrument: &Instrument, now: DateTime<Utc>, mode: ViewMode) -> String {
    let futures = format!("Futures LTP: ₹{}", format_currency(instrument.derivative_price));
    let capital = format!("Capital LTP: ₹{}", format_currency(instrument.market_price));
    let (first, second) = match mode {
        ViewMode::A => (futures, capital),
        ViewMode::B => (capital, futures),
    };
    let marker = match instrument.trend() {
        Trend::Positive => '▲',
        Trend::Negative => '▼',
    };
    format!(
        "{:<11} {} {:>7} | {:<24} | {:<24} | Updated {}",
        instrument.symbol,
        marker,
        format_percentage(instrument.change_percent),
        first,
        second,
        label_for(instrument.updated_at, now)
    )
}

/// Status line, error affordance and rows for the current state.
///
/// A failure keeps the preserved rows below the error message. While the very first
/// snapshot is loading, skeleton placeholders stand in for the rows.
pub fn render_board(
    state: &AcquisitionState,
    rows: &[Instrument],
    now: DateTime<Utc>,
    mode: ViewMode,
) -> Vec<String> {
    let mut lines = Vec::new();
    let status = match state.phase {
        Phase::Idle => "Idle".to_string(),
        Phase::Loading => "Refreshing...".to_string(),
        Phase::Ready => format!("{} of {} instruments", rows.len(), state.rows().len()),
        Phase::Failed => "Refresh failed".to_string(),
    };
    lines.push(format!("== Stock Watchlist Lite == [{}]", status));

    if let Some(err) = &state.last_error {
        lines.push("!! Something went wrong".to_string());
        lines.push("!! We couldn't load the stock data. Type 'retry' to try again.".to_string());
        lines.push(format!("!! {}", err));
    }

    if state.is_loading() && state.snapshot.is_none() {
        lines.extend((0..SKELETON_ROWS).map(|_| "░░░░░░░░ ░░░░░ ░░░░░░░░░░░░░░".to_string()));
        return lines;
    }

    if rows.is_empty() && state.snapshot.is_some() {
        lines.push("(no instruments match the search)".to_string());
    }
    lines.extend(rows.iter().map(|r| render_row(r, now, mode)));
    lines
}

/// Detail view: instrument fields and a summary of its series.
///
/// The series is generated once per selection from the price at that moment, so after
/// a refresh its close may differ from the displayed LTP.
pub fn render_detail(i: &Instrument, series: &[SeriesPoint], now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        format!("-- {} --", i.symbol),
        format!("Trading Symbol:     {}", i.symbol),
        format!("Capital Market LTP: ₹{}", format_currency(i.market_price)),
        format!("Futures LTP:        ₹{}", format_currency(i.derivative_price)),
        format!("Percentage Change:  {} ({})", format_percentage(i.change_percent), i.trend()),
        format!(
            "Last Updated:       {} ({})",
            i.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            label_for(i.updated_at, now)
        ),
    ];

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        let low = series.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let high = series.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
        lines.push(format!(
            "Price (last {} minutes): open {:.2} ({}) close {:.2} ({}) low {:.2} high {:.2}",
            series.len(),
            first.price,
            first.offset_label,
            last.price,
            last.offset_label,
            low,
            high
        ));
    }
    lines
}

/// Rows as JSON lines.
pub fn render_json(rows: &[Instrument], now: DateTime<Utc>) -> Result<Vec<String>> {
    rows.iter()
        .map(|r| Ok(serde_json::to_string(&RowView::new(r, now))?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::sync::Arc;
    use watchlist_common::WatchlistError;
    use watchlist_common::instrument::base_instruments;

    use crate::model::detail::DetailSession;

    fn ready(rows: &[Instrument]) -> AcquisitionState {
        AcquisitionState {
            phase: Phase::Ready,
            snapshot: Some(Arc::from(rows.to_vec())),
            last_error: None,
        }
    }

    #[test]
    fn row_shows_prices_in_mode_order() {
        let now = Utc::now();
        let row = &base_instruments(now - TimeDelta::seconds(42))[0];

        let a = render_row(row, now, ViewMode::A);
        assert!(a.starts_with("RELIANCE"));
        assert!(a.contains("+0.84%"));
        assert!(a.find("Futures").unwrap() < a.find("Capital").unwrap());
        assert!(a.contains("₹2,915.45"));
        assert!(a.ends_with("Updated 42 sec ago"));

        let b = render_row(row, now, ViewMode::B);
        assert!(b.find("Capital").unwrap() < b.find("Futures").unwrap());
    }

    #[test]
    fn first_load_shows_skeleton() {
        let state = AcquisitionState {
            phase: Phase::Loading,
            ..AcquisitionState::default()
        };
        let lines = render_board(&state, &[], Utc::now(), ViewMode::A);
        assert!(lines[0].contains("Refreshing..."));
        assert_eq!(lines.len(), 1 + SKELETON_ROWS);
    }

    #[test]
    fn failure_keeps_preserved_rows() {
        let rows = base_instruments(Utc::now());
        let mut state = ready(&rows);
        state.phase = Phase::Failed;
        state.last_error = Some(WatchlistError::AcquisitionFailure("Failed to fetch data".into()));

        let lines = render_board(&state, &rows, Utc::now(), ViewMode::A);
        assert!(lines.iter().any(|l| l.contains("retry")));
        assert!(lines.iter().any(|l| l.starts_with("BAJFINANCE")));
    }

    #[test]
    fn empty_search_result_is_reported() {
        let rows = base_instruments(Utc::now());
        let lines = render_board(&ready(&rows), &[], Utc::now(), ViewMode::A);
        assert_eq!(lines[0], "== Stock Watchlist Lite == [0 of 12 instruments]");
        assert!(lines[1].contains("no instruments match"));
    }

    #[test]
    fn detail_lists_series_summary() {
        let mut session = DetailSession::with_seed(4);
        session.select(base_instruments(Utc::now()).remove(0));
        let lines = render_detail(
            session.selected().unwrap(),
            session.current_series(),
            Utc::now(),
        );
        assert_eq!(lines[0], "-- RELIANCE --");
        assert!(lines.last().unwrap().contains("(29m)"));
        assert!(lines.last().unwrap().contains("(0m)"));
    }

    #[test]
    fn json_rows_carry_label() {
        let now = Utc::now();
        let rows = base_instruments(now - TimeDelta::seconds(90));
        let lines = render_json(&rows[..2], now).unwrap();
        assert_eq!(lines.len(), 2);
        let v: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(v["symbol"], "TCS");
        assert_eq!(v["trend"], "negative");
        assert_eq!(v["updated"], "1 min ago");
    }
}
