//! Interactive commands read line by line from stdin.
//!
//! The first word selects the command (case-insensitive); the rest are its arguments:
//!
//! ```text
//! refresh | retry
//! search <text>          (no text clears the search)
//! sort <key> [asc|desc]  (key: none, change, market, derivative)
//! select <SYMBOL>
//! clear | toggle | show | help | quit
//! ```
use std::str::FromStr;

use strum::EnumString;
use watchlist_common::{Result, SortDirection, SortKey, WatchlistError};

#[derive(Debug, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
enum Keyword {
    #[strum(serialize = "refresh", serialize = "retry", serialize = "r")]
    Refresh,
    #[strum(serialize = "search", serialize = "find", serialize = "/")]
    Search,
    Sort,
    #[strum(serialize = "select", serialize = "open")]
    Select,
    #[strum(serialize = "clear", serialize = "close")]
    Clear,
    Toggle,
    #[strum(serialize = "show", serialize = "ls")]
    Show,
    #[strum(serialize = "help", serialize = "?")]
    Help,
    #[strum(serialize = "quit", serialize = "exit", serialize = "q")]
    Quit,
}

/// A parsed interactive command.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardCommand {
    /// Start a new acquisition (also used to retry after a failure).
    Refresh,
    /// Replace the search text.
    Search(String),
    /// Replace the sort key and direction. A missing direction keeps the current one.
    Sort(SortKey, Option<SortDirection>),
    /// Inspect the instrument with this symbol.
    Select(String),
    /// Close the detail view.
    Clear,
    /// Swap the order of the two price columns.
    Toggle,
    /// Print the board again.
    Show,
    /// Print the command list.
    Help,
    /// Leave the dashboard.
    Quit,
}

/// Usage text printed by `help`.
pub const HELP: &str = "commands: refresh | search <text> | sort <none|change|market|derivative> [asc|desc] \
| select <SYMBOL> | clear | toggle | show | help | quit";

impl FromStr for DashboardCommand {
    type Err = WatchlistError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        if head.is_empty() {
            return Err(WatchlistError::InvalidCommand("empty command".to_string()));
        }

        let keyword = Keyword::from_str(head)
            .map_err(|_| WatchlistError::InvalidCommand(format!("unknown command '{}'", head)))?;

        let command = match keyword {
            Keyword::Refresh => DashboardCommand::Refresh,
            Keyword::Search => DashboardCommand::Search(rest.to_string()),
            Keyword::Sort => {
                let mut words = rest.split_whitespace();
                let key = words
                    .next()
                    .ok_or_else(|| WatchlistError::InvalidCommand("sort needs a key".to_string()))?;
                let key = SortKey::from_str(key)
                    .map_err(|_| WatchlistError::InvalidCommand(format!("unknown sort key '{}'", key)))?;
                let direction = words
                    .next()
                    .map(|d| {
                        SortDirection::from_str(d).map_err(|_| {
                            WatchlistError::InvalidCommand(format!("unknown sort direction '{}'", d))
                        })
                    })
                    .transpose()?;
                DashboardCommand::Sort(key, direction)
            }
            Keyword::Select => {
                if rest.is_empty() {
                    return Err(WatchlistError::InvalidCommand("select needs a symbol".to_string()));
                }
                DashboardCommand::Select(rest.to_uppercase())
            }
            Keyword::Clear => DashboardCommand::Clear,
            Keyword::Toggle => DashboardCommand::Toggle,
            Keyword::Show => DashboardCommand::Show,
            Keyword::Help => DashboardCommand::Help,
            Keyword::Quit => DashboardCommand::Quit,
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<DashboardCommand> {
        line.parse()
    }

    #[test]
    fn keywords_and_aliases() {
        assert_eq!(parse("refresh").unwrap(), DashboardCommand::Refresh);
        assert_eq!(parse("RETRY").unwrap(), DashboardCommand::Refresh);
        assert_eq!(parse("  quit  ").unwrap(), DashboardCommand::Quit);
        assert_eq!(parse("toggle").unwrap(), DashboardCommand::Toggle);
    }

    #[test]
    fn search_keeps_the_rest_of_the_line() {
        assert_eq!(parse("search  hdfc bank ").unwrap(), DashboardCommand::Search("hdfc bank".into()));
        assert_eq!(parse("search").unwrap(), DashboardCommand::Search(String::new()));
    }

    #[test]
    fn sort_with_and_without_direction() {
        assert_eq!(
            parse("sort change desc").unwrap(),
            DashboardCommand::Sort(SortKey::ChangePercent, Some(SortDirection::Descending))
        );
        assert_eq!(parse("sort market").unwrap(), DashboardCommand::Sort(SortKey::MarketPrice, None));
        assert!(parse("sort").is_err());
        assert!(parse("sort volume").is_err());
        assert!(parse("sort change sideways").is_err());
    }

    #[test]
    fn select_uppercases_symbol() {
        assert_eq!(parse("select reliance").unwrap(), DashboardCommand::Select("RELIANCE".into()));
        assert!(parse("select").is_err());
    }

    #[test]
    fn unknown_input_is_an_error() {
        assert!(matches!(parse("dance"), Err(WatchlistError::InvalidCommand(_))));
        assert!(parse("   ").is_err());
    }
}
