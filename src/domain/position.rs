use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::game::{split_game_key, GameState, Side};
use crate::error::{EdgeError, Result};

/// A hypothetical moneyline position on one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: Uuid,
    pub game_key: String,
    /// Team expected to win
    pub pick: String,
    /// Entry price in cents, 1-99
    pub price_cents: u8,
    pub contracts: u32,
    pub added_at: DateTime<Utc>,
}

impl Position {
    /// Build a validated position. The pick must be one of the two teams
    /// named by the game key.
    pub fn new(
        game_key: &str,
        pick: &str,
        price_cents: u8,
        contracts: u32,
        added_at: DateTime<Utc>,
    ) -> Result<Self> {
        let position = Self {
            id: Uuid::new_v4(),
            game_key: game_key.to_string(),
            pick: pick.to_string(),
            price_cents,
            contracts,
            added_at,
        };
        position.validate()?;
        Ok(position)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=99).contains(&self.price_cents) {
            return Err(EdgeError::Validation(format!(
                "price must be 1-99 cents, got {}",
                self.price_cents
            )));
        }
        if self.contracts == 0 {
            return Err(EdgeError::Validation(
                "contracts must be at least 1".to_string(),
            ));
        }
        let (away, home) = split_game_key(&self.game_key).ok_or_else(|| {
            EdgeError::Validation(format!("malformed game key: {}", self.game_key))
        })?;
        if self.pick != away && self.pick != home {
            return Err(EdgeError::Validation(format!(
                "pick {} is not playing in {}",
                self.pick, self.game_key
            )));
        }
        Ok(())
    }

    /// Dollars paid: price x contracts / 100
    pub fn cost(&self) -> Decimal {
        (Decimal::from(self.price_cents) * Decimal::from(self.contracts) / Decimal::ONE_HUNDRED)
            .round_dp(2)
    }

    /// Dollars won if the pick wins: (100 - price) x contracts / 100
    pub fn potential_win(&self) -> Decimal {
        let remaining = 100u8.saturating_sub(self.price_cents);
        (Decimal::from(remaining) * Decimal::from(self.contracts) / Decimal::ONE_HUNDRED)
            .round_dp(2)
    }
}

/// Where a position stands against the live game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Won,
    Lost,
    Cruising,
    Leading,
    Ahead,
    Close,
    Behind,
    Scheduled,
}

impl PositionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PositionStatus::Won => "WON",
            PositionStatus::Lost => "LOST",
            PositionStatus::Cruising => "CRUISING",
            PositionStatus::Leading => "LEADING",
            PositionStatus::Ahead => "AHEAD",
            PositionStatus::Close => "CLOSE",
            PositionStatus::Behind => "BEHIND",
            PositionStatus::Scheduled => "SCHEDULED",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            PositionStatus::Won | PositionStatus::Cruising | PositionStatus::Leading => "#00ff00",
            PositionStatus::Ahead => "#ffff00",
            PositionStatus::Close => "#ff8800",
            PositionStatus::Lost | PositionStatus::Behind => "#ff0000",
            PositionStatus::Scheduled => "#888888",
        }
    }

    /// Classify a lead (pick score minus opponent score) while in play
    pub fn from_lead(lead: i64) -> Self {
        if lead >= 14 {
            PositionStatus::Cruising
        } else if lead >= 7 {
            PositionStatus::Leading
        } else if lead >= 1 {
            PositionStatus::Ahead
        } else if lead >= -7 {
            PositionStatus::Close
        } else {
            PositionStatus::Behind
        }
    }
}

impl std::fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Evaluated position against the latest game snapshot
#[derive(Debug, Clone, Serialize)]
pub struct PositionView {
    pub position: Position,
    pub status: PositionStatus,
    /// Pick score minus opponent score (0 before kickoff)
    pub lead: i64,
    pub game_status: String,
    /// Realized P&L once final, None while open
    pub realized_pnl: Option<Decimal>,
    pub potential_win: Decimal,
    pub cost: Decimal,
}

impl PositionView {
    /// Evaluate a position against its game. Returns None when the game
    /// snapshot is for a different contest.
    pub fn evaluate(position: &Position, game: &GameState) -> Option<Self> {
        if position.game_key != game.game_key {
            return None;
        }
        let pick_side = game.side_of(&position.pick).unwrap_or(Side::Home);
        let pick_score = i64::from(game.score(pick_side));
        let opp_score = i64::from(game.score(pick_side.opposite()));
        let cost = position.cost();
        let potential_win = position.potential_win();

        let (status, lead, realized_pnl) = if game.is_final() {
            let won = pick_score > opp_score;
            let status = if won {
                PositionStatus::Won
            } else {
                PositionStatus::Lost
            };
            let pnl = if won { potential_win } else { -cost };
            (status, pick_score - opp_score, Some(pnl))
        } else if game.period > 0 {
            let lead = pick_score - opp_score;
            (PositionStatus::from_lead(lead), lead, None)
        } else {
            (PositionStatus::Scheduled, 0, None)
        };

        Some(Self {
            position: position.clone(),
            status,
            lead,
            game_status: game.status_text(),
            realized_pnl,
            potential_win,
            cost,
        })
    }
}
