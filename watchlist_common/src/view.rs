//! Search/sort view state and the pure view derivation.
//!
//! The rows a dashboard renders are always a function of four inputs: the latest
//! snapshot, the search query, the sort key and the sort direction. `derive` computes
//! that function without side effects, so callers recompute it whenever any input is
//! read instead of caching a result that could go stale.

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::instrument::Instrument;

/// Numeric field rows are ordered by.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, Display, EnumString, Eq, PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum SortKey {
    /// Keep snapshot order.
    #[default]
    #[strum(to_string = "none", serialize = "default")]
    #[value(name = "none", alias = "default")]
    None,
    /// Percentage change.
    #[strum(to_string = "change", serialize = "change-percent", serialize = "percentageChange")]
    #[value(name = "change", alias = "change-percent")]
    ChangePercent,
    /// Cash-market price.
    #[strum(to_string = "market", serialize = "market-price", serialize = "capital")]
    #[value(name = "market", alias = "market-price", alias = "capital")]
    MarketPrice,
    /// Futures price.
    #[strum(to_string = "derivative", serialize = "derivative-price", serialize = "futures")]
    #[value(name = "derivative", alias = "derivative-price", alias = "futures")]
    DerivativePrice,
}

impl SortKey {
    /// Value of the keyed field, or `None` for `SortKey::None`.
    pub fn value_of(&self, instrument: &Instrument) -> Option<f64> {
        match self {
            SortKey::None => None,
            SortKey::ChangePercent => Some(instrument.change_percent),
            SortKey::MarketPrice => Some(instrument.market_price),
            SortKey::DerivativePrice => Some(instrument.derivative_price),
        }
    }
}

/// Order applied to the keyed field.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, Display, EnumString, Eq, PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[strum(to_string = "asc", serialize = "ascending")]
    #[value(name = "asc", alias = "ascending")]
    Ascending,
    /// Largest first.
    #[strum(to_string = "desc", serialize = "descending")]
    #[value(name = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Search and sort inputs owned by the presentation layer and passed explicitly to
/// [`derive`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ViewState {
    /// Case-insensitive substring matched against the symbol. Empty matches all.
    pub search_query: String,
    /// Field to order by.
    pub sort_key: SortKey,
    /// Order of the keyed field.
    pub sort_direction: SortDirection,
}

impl ViewState {
    /// Create a view state from its parts.
    pub fn new(search_query: &str, sort_key: SortKey, sort_direction: SortDirection) -> Self {
        Self {
            search_query: search_query.to_string(),
            sort_key,
            sort_direction,
        }
    }

    /// Derive the rendered rows of `snapshot` under this view state.
    pub fn apply(&self, snapshot: &[Instrument]) -> Vec<Instrument> {
        derive(snapshot, &self.search_query, self.sort_key, self.sort_direction)
    }
}

/// Case-insensitive substring match of `query` against the instrument symbol.
pub fn matches_query(instrument: &Instrument, query: &str) -> bool {
    query.is_empty() || instrument.symbol.to_lowercase().contains(&query.to_lowercase())
}

/// Filter `snapshot` by `search_query` and order the survivors by `sort_key`.
///
/// The sort is stable: rows with equal keys keep their snapshot order regardless of
/// `sort_direction`, which only flips the comparison of distinct keys.
pub fn derive(
    snapshot: &[Instrument],
    search_query: &str,
    sort_key: SortKey,
    sort_direction: SortDirection,
) -> Vec<Instrument> {
    let mut rows: Vec<Instrument> = snapshot
        .iter()
        .filter(|i| matches_query(i, search_query))
        .cloned()
        .collect();

    if sort_key != SortKey::None {
        rows.sort_by(|a, b| {
            let ordering = match (sort_key.value_of(a), sort_key.value_of(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            };
            sort_direction.apply(ordering)
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::base_instruments;
    use chrono::Utc;
    use std::str::FromStr;

    fn row(id: u32, symbol: &str, change: f64) -> Instrument {
        Instrument::new(id, symbol, 100.0, 100.0, change, Utc::now())
    }

    fn symbols(rows: &[Instrument]) -> Vec<&str> {
        rows.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn unmatched_query_yields_nothing() {
        let snapshot = base_instruments(Utc::now());
        assert!(derive(&snapshot, "zzz", SortKey::None, SortDirection::Ascending).is_empty());
        assert!(derive(&snapshot, "zzz", SortKey::MarketPrice, SortDirection::Descending).is_empty());
    }

    #[test]
    fn empty_query_and_no_key_is_identity() {
        let snapshot = base_instruments(Utc::now());
        assert_eq!(derive(&snapshot, "", SortKey::None, SortDirection::Descending), snapshot);
    }

    #[test]
    fn search_ignores_case() {
        let snapshot = base_instruments(Utc::now());
        let rows = derive(&snapshot, "fin", SortKey::None, SortDirection::Ascending);
        assert_eq!(symbols(&rows), vec!["BAJFINANCE"]);

        let rows = derive(&snapshot, "In", SortKey::None, SortDirection::Ascending);
        assert_eq!(symbols(&rows), vec!["INFY", "SBIN", "HINDUNILVR", "BAJFINANCE"]);
    }

    #[test]
    fn change_percent_descending() {
        let snapshot = vec![row(1, "AAA", 0.5), row(2, "BBB", -0.2), row(3, "CCC", 1.1)];
        let rows = derive(&snapshot, "", SortKey::ChangePercent, SortDirection::Descending);
        assert_eq!(symbols(&rows), vec!["CCC", "AAA", "BBB"]);
    }

    #[test]
    fn equal_keys_keep_input_order_in_both_directions() {
        let snapshot = vec![
            row(1, "AAA", 0.3),
            row(2, "BBB", 0.1),
            row(3, "CCC", 0.3),
            row(4, "DDD", 0.1),
        ];
        let asc = derive(&snapshot, "", SortKey::ChangePercent, SortDirection::Ascending);
        assert_eq!(symbols(&asc), vec!["BBB", "DDD", "AAA", "CCC"]);

        let desc = derive(&snapshot, "", SortKey::ChangePercent, SortDirection::Descending);
        assert_eq!(symbols(&desc), vec!["AAA", "CCC", "BBB", "DDD"]);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let snapshot = base_instruments(Utc::now());
        let once = derive(&snapshot, "a", SortKey::MarketPrice, SortDirection::Descending);
        let twice = derive(&once, "a", SortKey::None, SortDirection::Ascending);
        assert_eq!(once, twice);
        assert!(once.iter().all(|i| matches_query(i, "A")));
    }

    #[test]
    fn view_state_apply_matches_derive() {
        let snapshot = base_instruments(Utc::now());
        let view = ViewState::new("i", SortKey::DerivativePrice, SortDirection::Ascending);
        let rows = view.apply(&snapshot);
        assert_eq!(rows, derive(&snapshot, "i", SortKey::DerivativePrice, SortDirection::Ascending));
        assert!(rows.windows(2).all(|w| w[0].derivative_price <= w[1].derivative_price));
    }

    #[test]
    fn keys_and_directions_parse_from_text() {
        assert_eq!(<SortKey as FromStr>::from_str("Change").unwrap(), SortKey::ChangePercent);
        assert_eq!(<SortKey as FromStr>::from_str("futures").unwrap(), SortKey::DerivativePrice);
        assert_eq!(<SortKey as FromStr>::from_str("default").unwrap(), SortKey::None);
        assert_eq!(<SortDirection as FromStr>::from_str("DESC").unwrap(), SortDirection::Descending);
        assert_eq!(SortKey::MarketPrice.to_string(), "market");
        assert!(<SortKey as FromStr>::from_str("volume").is_err());
    }
}
