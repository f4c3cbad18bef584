//! Kalshi market links
//!
//! NFL moneyline markets live under the `KXNFLGAME` series; a game's ticker
//! is the series, the game date as `YYMONDD` and both venue team codes.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::config::DEFAULT_VENUE_URL;
use crate::domain::TeamDirectory;

pub const NFL_GAME_SERIES: &str = "KXNFLGAME";

/// Builds trade links for the venue
#[derive(Debug, Clone)]
pub struct TradeUrlBuilder {
    base_url: String,
    teams: TeamDirectory,
}

impl TradeUrlBuilder {
    pub fn new(base_url: &str, teams: TeamDirectory) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            teams,
        }
    }

    /// Ticker, e.g. `KXNFLGAME-25NOV09BUFMIA`
    pub fn ticker<Tz>(&self, away_team: &str, home_team: &str, date: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let date_str = date.format("%y%b%d").to_string().to_uppercase();
        format!(
            "{NFL_GAME_SERIES}-{date_str}{}{}",
            self.teams.venue_code(away_team),
            self.teams.venue_code(home_team)
        )
    }

    /// Market page for a game
    pub fn trade_url<Tz>(&self, away_team: &str, home_team: &str, date: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format!(
            "{}/markets/{NFL_GAME_SERIES}/{}",
            self.base_url,
            self.ticker(away_team, home_team, date)
        )
    }
}

impl Default for TradeUrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_VENUE_URL, TeamDirectory::nfl())
    }
}

/// Trade link using the default venue and the NFL team directory
pub fn build_trade_url<Tz>(away_team: &str, home_team: &str, date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    TradeUrlBuilder::default().trade_url(away_team, home_team, date)
}
