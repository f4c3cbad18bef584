//! `nfl-edge positions` - track hypothetical moneyline positions.

use chrono::Utc;
use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use super::output::{self, OutputMode};
use crate::adapters::{EspnClient, JsonPositionStore, PositionBook, ScoreFeed};
use crate::config::AppConfig;
use crate::domain::{game_key, GameState, Position, PositionView, TeamDirectory};
use crate::error::EdgeError;

#[derive(Subcommand, Debug, Clone)]
pub enum PositionCommands {
    /// List positions with live status and P&L
    List,
    /// Add a position
    Add {
        away: String,
        home: String,
        /// Team expected to win
        #[arg(long)]
        pick: String,
        /// Entry price in cents (1-99)
        #[arg(long)]
        price: u8,
        #[arg(long, default_value = "1")]
        contracts: u32,
    },
    /// Edit the position at a listed number
    Edit {
        number: usize,
        #[arg(long)]
        price: Option<u8>,
        #[arg(long)]
        contracts: Option<u32>,
        #[arg(long)]
        pick: Option<String>,
    },
    /// Remove the position at a listed number
    Remove { number: usize },
    /// Remove every position
    Clear,
}

#[derive(Debug, Serialize, Tabled)]
pub struct PositionRow {
    #[tabled(rename = "#")]
    pub number: usize,
    pub game: String,
    pub pick: String,
    pub price: String,
    pub contracts: u32,
    pub cost: String,
    #[tabled(rename = "to win")]
    pub to_win: String,
    pub status: String,
    pub pnl: String,
}

impl PositionRow {
    pub fn build(number: usize, position: &Position, view: Option<&PositionView>) -> Self {
        let (status, pnl) = match view {
            Some(v) => (
                if v.lead != 0 && v.realized_pnl.is_none() {
                    format!("{} ({:+})", v.status, v.lead)
                } else {
                    v.status.to_string()
                },
                v.realized_pnl.map(money).unwrap_or_else(|| "—".to_string()),
            ),
            None => ("UNTRACKED".to_string(), "—".to_string()),
        };
        Self {
            number,
            game: position.game_key.clone(),
            pick: position.pick.clone(),
            price: format!("{}¢", position.price_cents),
            contracts: position.contracts,
            cost: money(position.cost()),
            to_win: money(position.potential_win()),
            status,
            pnl,
        }
    }
}

fn money(d: Decimal) -> String {
    if d.is_sign_negative() {
        format!("-${:.2}", d.abs())
    } else {
        format!("${d:.2}")
    }
}

/// Listed numbers start at 1
fn to_index(number: usize) -> Result<usize, EdgeError> {
    number
        .checked_sub(1)
        .ok_or(EdgeError::PositionNotFound(number))
}

pub async fn run(cmd: PositionCommands, cfg: &AppConfig, mode: OutputMode) -> anyhow::Result<()> {
    let teams = TeamDirectory::nfl();
    let mut book = PositionBook::open(JsonPositionStore::new(&cfg.positions.path)).await?;

    match cmd {
        PositionCommands::List => {
            let feed = EspnClient::new(&cfg.feed, teams)?;
            let games = match feed.fetch_games().await {
                Ok(games) => games,
                Err(e) => {
                    warn!("scoreboard unavailable, positions shown untracked: {}", e);
                    Vec::new()
                }
            };
            list(book.positions(), &games, mode)?;
        }
        PositionCommands::Add {
            away,
            home,
            pick,
            price,
            contracts,
        } => {
            let key = game_key(&teams.canonical_name(&away), &teams.canonical_name(&home));
            let position =
                Position::new(&key, &teams.canonical_name(&pick), price, contracts, Utc::now())?;
            let cost = position.cost();
            book.add(position).await?;
            output::print_success(&format!("Added {pick} in {key} ({}).", money(cost)));
        }
        PositionCommands::Edit {
            number,
            price,
            contracts,
            pick,
        } => {
            let pick = pick.map(|p| teams.canonical_name(&p));
            book.edit(to_index(number)?, price, contracts, pick).await?;
            output::print_success(&format!("Updated position #{number}."));
        }
        PositionCommands::Remove { number } => {
            let removed = book.remove(to_index(number)?).await?;
            output::print_success(&format!(
                "Removed {} in {}.",
                removed.pick, removed.game_key
            ));
        }
        PositionCommands::Clear => {
            let n = book.positions().len();
            book.clear().await?;
            output::print_success(&format!("Cleared {n} positions."));
        }
    }
    Ok(())
}

fn list(positions: &[Position], games: &[GameState], mode: OutputMode) -> anyhow::Result<()> {
    let views: Vec<Option<PositionView>> = positions
        .iter()
        .map(|p| {
            games
                .iter()
                .find(|g| g.game_key == p.game_key)
                .and_then(|g| PositionView::evaluate(p, g))
        })
        .collect();

    let rows: Vec<PositionRow> = positions
        .iter()
        .zip(&views)
        .enumerate()
        .map(|(i, (p, v))| PositionRow::build(i + 1, p, v.as_ref()))
        .collect();
    output::print_items(&rows, mode)?;

    if mode == OutputMode::Table && !positions.is_empty() {
        let at_risk: Decimal = positions.iter().map(Position::cost).sum();
        let realized: Decimal = views
            .iter()
            .flatten()
            .filter_map(|v| v.realized_pnl)
            .sum();
        output::print_kv("at risk", &money(at_risk));
        output::print_kv("realized", &money(realized));
    }
    Ok(())
}
