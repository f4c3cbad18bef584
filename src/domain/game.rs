use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle of a contest as reported by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "SCHEDULED",
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::Final => "FINAL",
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Home or away side of a contest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Stable join key for a contest: `"{away}@{home}"`
pub fn game_key(away_team: &str, home_team: &str) -> String {
    format!("{away_team}@{home_team}")
}

/// Split a game key back into `(away, home)`
pub fn split_game_key(key: &str) -> Option<(&str, &str)> {
    key.split_once('@')
}

/// One snapshot of a contest, rebuilt on every poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub game_key: String,
    pub event_id: String,
    pub away_team: String,
    pub home_team: String,
    pub away_score: u32,
    pub home_score: u32,
    /// 0 = not started, 1-4 = quarters, >=5 = overtime
    pub period: u8,
    /// "MM:SS" counting down within the period
    pub clock: String,
    pub status: GameStatus,
    pub down: Option<u8>,
    pub distance: Option<u32>,
    pub yards_to_endzone: Option<u32>,
    pub possession: Option<Side>,
    pub possession_text: Option<String>,
    /// Absolute field position, 0 = away end zone, 100 = home end zone
    pub ball_yard: u32,
    pub is_red_zone: bool,
    pub game_date: DateTime<Utc>,
}

impl GameState {
    /// Minimal pre-game snapshot; the normalizer and tests fill in the rest
    pub fn new(away_team: &str, home_team: &str, game_date: DateTime<Utc>) -> Self {
        Self {
            game_key: game_key(away_team, home_team),
            event_id: String::new(),
            away_team: away_team.to_string(),
            home_team: home_team.to_string(),
            away_score: 0,
            home_score: 0,
            period: 0,
            clock: String::new(),
            status: GameStatus::Scheduled,
            down: None,
            distance: None,
            yards_to_endzone: None,
            possession: None,
            possession_text: None,
            ball_yard: 50,
            is_red_zone: false,
            game_date,
        }
    }

    /// Combined score of both teams
    pub fn total(&self) -> u32 {
        self.away_score.saturating_add(self.home_score)
    }

    /// Absolute score margin
    pub fn margin(&self) -> u32 {
        self.home_score.abs_diff(self.away_score)
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    /// Which side a team name refers to in this game
    pub fn side_of(&self, team: &str) -> Option<Side> {
        if team == self.home_team {
            Some(Side::Home)
        } else if team == self.away_team {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn possession_team(&self) -> Option<&str> {
        self.possession.map(|side| self.team(side))
    }

    /// True when the side with the ball is behind on the scoreboard
    pub fn possession_trailing(&self) -> bool {
        match self.possession {
            Some(side) => self.score(side) < self.score(side.opposite()),
            None => false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.period > 0 && self.status != GameStatus::Final
    }

    pub fn is_final(&self) -> bool {
        self.status == GameStatus::Final
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == GameStatus::Scheduled
    }

    /// Side that won a finished game (ties go to the away side)
    pub fn winner(&self) -> Side {
        if self.home_score > self.away_score {
            Side::Home
        } else {
            Side::Away
        }
    }

    /// Short status line: "FINAL", "Q3 05:00" or "SCHEDULED"
    pub fn status_text(&self) -> String {
        if self.is_final() {
            "FINAL".to_string()
        } else if self.period > 0 {
            format!("Q{} {}", self.period, self.clock)
        } else {
            "SCHEDULED".to_string()
        }
    }
}

/// One entry of a team's injury report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryRecord {
    pub player_name: String,
    /// Free text, e.g. "Out", "Questionable"
    pub status: String,
    /// Position abbreviation, e.g. "QB"
    pub position: String,
}

impl InjuryRecord {
    pub fn new(player_name: &str, status: &str, position: &str) -> Self {
        Self {
            player_name: player_name.to_string(),
            status: status.to_string(),
            position: position.to_string(),
        }
    }
}

/// Injury records grouped by canonical team name
pub type InjuryReport = HashMap<String, Vec<InjuryRecord>>;
