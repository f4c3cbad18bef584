//! Live-state classification
//!
//! Coarse read of how settled an in-progress game is: how many
//! possessions separate the teams and how much the price is expected to
//! swing on the next play.

use serde::Serialize;

use super::signals::{Severity, SignalLabel};
use crate::domain::{GameState, Side};

/// Score gap in possessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PossessionPressure {
    OnePossession,
    TwoPossessions,
    Blowout,
}

impl PossessionPressure {
    pub fn from_margin(margin: u32) -> Self {
        if margin >= 17 {
            PossessionPressure::Blowout
        } else if margin >= 9 {
            PossessionPressure::TwoPossessions
        } else {
            PossessionPressure::OnePossession
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PossessionPressure::OnePossession => "One Poss",
            PossessionPressure::TwoPossessions => "Two Poss",
            PossessionPressure::Blowout => "Blowout",
        }
    }
}

impl std::fmt::Display for PossessionPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Expected price instability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UncertaintyBand {
    Normal,
    Elevated,
    Max,
}

impl UncertaintyBand {
    pub fn classify(period: u8, margin: u32) -> Self {
        if period >= 5 {
            UncertaintyBand::Max
        } else if period == 4 && margin <= 8 {
            UncertaintyBand::Elevated
        } else {
            UncertaintyBand::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UncertaintyBand::Normal => "NORMAL",
            UncertaintyBand::Elevated => "ELEVATED",
            UncertaintyBand::Max => "MAX UNCERTAINTY",
        }
    }

    /// Typical per-play price leak
    pub fn expected_leak(&self) -> &'static str {
        match self {
            UncertaintyBand::Normal => "—",
            UncertaintyBand::Elevated => "1-4¢",
            UncertaintyBand::Max => "3-7¢",
        }
    }
}

impl SignalLabel for UncertaintyBand {
    fn severity(&self) -> Severity {
        match self {
            UncertaintyBand::Normal => Severity::Low,
            UncertaintyBand::Elevated => Severity::Moderate,
            UncertaintyBand::Max => Severity::Critical,
        }
    }
}

impl std::fmt::Display for UncertaintyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveState {
    pub possession: PossessionPressure,
    pub uncertainty: UncertaintyBand,
    pub expected_leak: &'static str,
    /// Side currently ahead, None when tied
    pub leader: Option<Side>,
}

impl LiveState {
    pub fn classify(game: &GameState) -> Self {
        let margin = game.margin();
        let uncertainty = UncertaintyBand::classify(game.period, margin);
        let leader = match game.home_score.cmp(&game.away_score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        };
        Self {
            possession: PossessionPressure::from_margin(margin),
            uncertainty,
            expected_leak: uncertainty.expected_leak(),
            leader,
        }
    }
}

/// Settled result of a finished game
#[derive(Debug, Clone, Serialize)]
pub struct FinalResult {
    pub game_key: String,
    pub winner: String,
    pub winner_side: Side,
    pub home_score: u32,
    pub away_score: u32,
}

impl FinalResult {
    pub fn from_game(game: &GameState) -> Self {
        let side = game.winner();
        Self {
            game_key: game.game_key.clone(),
            winner: game.team(side).to_string(),
            winner_side: side,
            home_score: game.home_score,
            away_score: game.away_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GameStatus;
    use chrono::Utc;

    fn game(away: u32, home: u32, period: u8) -> GameState {
        let mut g = GameState::new("Buffalo", "Miami", Utc::now());
        g.away_score = away;
        g.home_score = home;
        g.period = period;
        g.status = GameStatus::InProgress;
        g
    }

    #[test]
    fn test_possession_bands() {
        assert_eq!(PossessionPressure::from_margin(0), PossessionPressure::OnePossession);
        assert_eq!(PossessionPressure::from_margin(8), PossessionPressure::OnePossession);
        assert_eq!(PossessionPressure::from_margin(9), PossessionPressure::TwoPossessions);
        assert_eq!(PossessionPressure::from_margin(16), PossessionPressure::TwoPossessions);
        assert_eq!(PossessionPressure::from_margin(17).to_string(), "Blowout");
    }

    #[test]
    fn test_uncertainty_bands() {
        let ot = LiveState::classify(&game(20, 20, 5));
        assert_eq!(ot.uncertainty, UncertaintyBand::Max);
        assert_eq!(ot.expected_leak, "3-7¢");
        assert_eq!(ot.uncertainty.severity(), Severity::Critical);
        assert_eq!(ot.leader, None);

        let close_fourth = LiveState::classify(&game(17, 24, 4));
        assert_eq!(close_fourth.uncertainty, UncertaintyBand::Elevated);
        assert_eq!(close_fourth.expected_leak, "1-4¢");
        assert_eq!(close_fourth.leader, Some(Side::Home));

        let wide_fourth = LiveState::classify(&game(31, 10, 4));
        assert_eq!(wide_fourth.uncertainty, UncertaintyBand::Normal);
        assert_eq!(wide_fourth.possession, PossessionPressure::Blowout);

        let first = LiveState::classify(&game(0, 3, 1));
        assert_eq!(first.uncertainty, UncertaintyBand::Normal);
        assert_eq!(first.expected_leak, "—");
    }

    #[test]
    fn test_final_result_winner() {
        let mut g = game(21, 24, 4);
        g.status = GameStatus::Final;
        let result = FinalResult::from_game(&g);
        assert_eq!(result.winner, "Miami");

        // Level final goes to the away side
        g.away_score = 24;
        assert_eq!(FinalResult::from_game(&g).winner, "Buffalo");
    }
}
