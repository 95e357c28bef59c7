//! Presentation state of the dashboard.
//!
//! `Dashboard` owns everything the user changes directly: the search/sort view state,
//! the price column order and the detail session. It never holds rows; the visible
//! rows are derived from the controller's snapshot each time they are needed.

use log::{debug, info};
use watchlist_common::{Instrument, Result, ViewState, WatchlistError};

use crate::model::command::DashboardCommand;
use crate::model::detail::DetailSession;

/// Order of the two price columns on a row.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ViewMode {
    /// Futures price first.
    #[default]
    A,
    /// Cash-market price first.
    B,
}

impl ViewMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::A => ViewMode::B,
            ViewMode::B => ViewMode::A,
        }
    }
}

/// What the main loop should do after a command was applied.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Effect {
    /// Print the board.
    Render,
    /// Start an acquisition.
    Refresh,
    /// Print the command list.
    Help,
    /// Leave the loop.
    Quit,
}

/// User-controlled dashboard state.
pub struct Dashboard {
    /// Search and sort inputs.
    pub view: ViewState,
    /// Price column order.
    pub mode: ViewMode,
    /// Currently inspected instrument.
    pub detail: DetailSession,
}

impl Dashboard {
    /// Dashboard starting from `view`.
    pub fn new(view: ViewState, detail: DetailSession) -> Self {
        Self {
            view,
            mode: ViewMode::default(),
            detail,
        }
    }

    /// Rows to render for `snapshot`, recomputed on every call.
    pub fn visible(&self, snapshot: &[Instrument]) -> Vec<Instrument> {
        self.view.apply(snapshot)
    }

    /// Apply `command` against the latest `snapshot`.
    pub fn apply(&mut self, command: DashboardCommand, snapshot: &[Instrument]) -> Result<Effect> {
        debug!("Applying command {:?}", command);
        let effect = match command {
            DashboardCommand::Refresh => Effect::Refresh,
            DashboardCommand::Search(query) => {
                self.view.search_query = query;
                Effect::Render
            }
            DashboardCommand::Sort(key, direction) => {
                self.view.sort_key = key;
                if let Some(direction) = direction {
                    self.view.sort_direction = direction;
                }
                Effect::Render
            }
            DashboardCommand::Select(symbol) => {
                let instrument = snapshot
                    .iter()
                    .find(|i| i.symbol.eq_ignore_ascii_case(&symbol))
                    .ok_or_else(|| WatchlistError::UnknownSymbol(symbol.clone()))?;
                info!("Inspecting {}", instrument.symbol);
                self.detail.select(instrument.clone());
                Effect::Render
            }
            DashboardCommand::Clear => {
                self.detail.clear();
                Effect::Render
            }
            DashboardCommand::Toggle => {
                self.mode = self.mode.toggled();
                Effect::Render
            }
            DashboardCommand::Show => Effect::Render,
            DashboardCommand::Help => Effect::Help,
            DashboardCommand::Quit => Effect::Quit,
        };
        Ok(effect)
    }
}
