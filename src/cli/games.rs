//! `nfl-edge games` - the current scoreboard.

use serde::Serialize;
use tabled::Tabled;

use super::output::{self, OutputMode};
use crate::adapters::{EspnClient, ScoreFeed};
use crate::config::AppConfig;
use crate::domain::{GameState, TeamDirectory};

#[derive(Debug, Serialize, Tabled)]
pub struct GameRow {
    pub game: String,
    pub score: String,
    pub status: String,
    pub kickoff: String,
}

impl GameRow {
    pub fn build(game: &GameState, teams: &TeamDirectory) -> Self {
        Self {
            game: game.game_key.clone(),
            score: if game.is_scheduled() {
                "—".to_string()
            } else {
                output::score_line(
                    &teams.display_code(&game.away_team),
                    game.away_score,
                    game.home_score,
                    &teams.display_code(&game.home_team),
                )
            },
            status: game.status_text(),
            kickoff: game.game_date.format("%a %b %d %H:%M UTC").to_string(),
        }
    }
}

pub async fn run(cfg: &AppConfig, mode: OutputMode) -> anyhow::Result<()> {
    let teams = TeamDirectory::nfl();
    let feed = EspnClient::new(&cfg.feed, teams.clone())?;
    let mut games = feed.fetch_games().await?;
    games.sort_by_key(|g| g.game_date);

    if mode == OutputMode::Json {
        return output::print_json(&games);
    }
    let rows: Vec<GameRow> = games.iter().map(|g| GameRow::build(g, &teams)).collect();
    output::print_items(&rows, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GameStatus;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_game_rows() {
        let teams = TeamDirectory::nfl();
        let date = Utc.with_ymd_and_hms(2025, 11, 9, 18, 0, 0).unwrap();
        let mut g = GameState::new("Buffalo", "Miami", date);
        let row = GameRow::build(&g, &teams);
        assert_eq!(row.score, "—");
        assert_eq!(row.status, "SCHEDULED");
        assert_eq!(row.kickoff, "Sun Nov 09 18:00 UTC");

        g.status = GameStatus::Final;
        g.period = 4;
        g.away_score = 30;
        g.home_score = 13;
        let row = GameRow::build(&g, &teams);
        assert_eq!(row.score, "BUF 30 - 13 MIA");
        assert_eq!(row.status, "FINAL");
    }
}
