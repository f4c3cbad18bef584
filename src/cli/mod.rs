//! nfl-edge CLI
//!
//! Commands:
//! - `nfl-edge live` - signal feeds for games in progress
//! - `nfl-edge picks` - ranked pre-game picks
//! - `nfl-edge games` - the current scoreboard
//! - `nfl-edge positions` - track hypothetical positions
//! - `nfl-edge url` - venue link for a matchup

pub mod games;
pub mod live;
pub mod output;
pub mod picks;
pub mod positions;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::adapters::TradeUrlBuilder;
use crate::config::AppConfig;
use crate::domain::TeamDirectory;

pub use output::OutputMode;
pub use positions::PositionCommands;

/// NFL live signals and pre-game edge finder
#[derive(Parser, Debug)]
#[command(name = "nfl-edge")]
#[command(author, version, about = "NFL live signals and pre-game edge picks", long_about = None)]
pub struct Cli {
    /// Config directory (default.toml and environment overlays)
    #[arg(short, long, global = true, default_value = "config")]
    pub config: PathBuf,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Signal feeds for games in progress
    ///
    /// Drought and momentum build up across polls, so they are only
    /// shown with --watch.
    Live {
        /// Keep polling until interrupted
        #[arg(short, long)]
        watch: bool,
        /// Override the poll interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Ranked picks for scheduled games
    Picks {
        /// Include picks below the minimum score
        #[arg(long)]
        all: bool,
        /// Override the minimum pick score
        #[arg(long)]
        min_score: Option<f64>,
    },
    /// Current scoreboard
    Games,
    /// Manage tracked positions
    #[command(subcommand)]
    Positions(PositionCommands),
    /// Print the venue trade link for a matchup
    Url {
        /// Away team, e.g. "Buffalo"
        away: String,
        /// Home team, e.g. "Miami"
        home: String,
        /// Game date, defaults to today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }

    /// Short commands skip the full logging setup
    pub fn is_long_running(&self) -> bool {
        matches!(self.command, Commands::Live { watch: true, .. })
    }
}

/// `nfl-edge url`
pub fn run_url(
    cfg: &AppConfig,
    away: &str,
    home: &str,
    date: Option<NaiveDate>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let teams = TeamDirectory::nfl();
    let away = teams.canonical_name(away);
    let home = teams.canonical_name(home);
    let day = date.unwrap_or_else(|| Utc::now().date_naive());
    let when = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));

    let builder = TradeUrlBuilder::new(&cfg.venue.base_url, teams);
    let ticker = builder.ticker(&away, &home, &when);
    let url = builder.trade_url(&away, &home, &when);

    match mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "away": away,
            "home": home,
            "ticker": ticker,
            "url": url,
        }))?,
        OutputMode::Table => {
            output::print_kv("ticker", &ticker);
            output::print_kv("url", &url);
        }
    }
    Ok(())
}
