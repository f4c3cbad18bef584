//! `nfl-edge live` - signal feeds for games in progress.

use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tabled::Tabled;
use tracing::info;

use super::output::{self, OutputMode};
use crate::adapters::EspnClient;
use crate::config::AppConfig;
use crate::domain::{GameState, TeamDirectory};
use crate::strategy::{Dashboard, FeedStatus, LiveGameView, PollReport};

const UNTRACKED: &str = "—";

#[derive(Debug, Serialize, Tabled)]
pub struct LiveRow {
    pub game: String,
    pub time: String,
    pub ball: String,
    pub field: String,
    pub down: String,
    pub clock: String,
    pub drought: String,
    pub blowout: String,
    pub momentum: String,
    pub state: String,
}

impl LiveRow {
    /// Drought and momentum need earlier polls; with `tracked` false they
    /// are blanked rather than shown as their first-poll defaults.
    pub fn build(view: &LiveGameView, teams: &TeamDirectory, tracked: bool) -> Self {
        let g = &view.game;
        let s = &view.signals;
        Self {
            game: output::score_line(
                &teams.display_code(&g.away_team),
                g.away_score,
                g.home_score,
                &teams.display_code(&g.home_team),
            ),
            time: g.status_text(),
            ball: ball_text(g, teams),
            field: s.field.to_string(),
            down: s.down.to_string(),
            clock: s.clock.to_string(),
            drought: if tracked {
                s.drought.to_string()
            } else {
                UNTRACKED.to_string()
            },
            blowout: s.blowout.to_string(),
            momentum: if tracked {
                s.momentum.to_string()
            } else {
                UNTRACKED.to_string()
            },
            state: format!(
                "{} / {} {}",
                view.live_state.possession,
                view.live_state.uncertainty,
                view.live_state.expected_leak
            ),
        }
    }
}

fn ordinal(n: u8) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// "MIA 3rd & 8", falling back to the feed's possession text
fn ball_text(game: &GameState, teams: &TeamDirectory) -> String {
    let team = game
        .possession_team()
        .map(|t| teams.display_code(t))
        .unwrap_or_default();
    match (game.down, game.distance) {
        (Some(down), Some(distance)) => format!("{team} {} & {distance}", ordinal(down))
            .trim()
            .to_string(),
        _ => game
            .possession_text
            .clone()
            .unwrap_or_else(|| "—".to_string()),
    }
}

pub(crate) fn report_feed_status(report: &PollReport) {
    if let FeedStatus::Unavailable(reason) = &report.games_status {
        output::print_warn(&format!("Scoreboard unavailable: {reason}"));
    }
    if let FeedStatus::Unavailable(reason) = &report.injuries_status {
        output::print_warn(&format!("Injury report unavailable: {reason}"));
    }
}

fn render(
    report: &PollReport,
    teams: &TeamDirectory,
    tracked: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        return output::print_json(report);
    }
    report_feed_status(report);
    let rows: Vec<LiveRow> = report
        .live
        .iter()
        .map(|v| LiveRow::build(v, teams, tracked))
        .collect();
    output::print_items(&rows, mode)?;
    for result in &report.finals {
        output::print_kv(
            "final",
            &format!(
                "{} ({}-{}) winner {}",
                result.game_key, result.away_score, result.home_score, result.winner
            ),
        );
    }
    Ok(())
}

pub async fn run(
    cfg: &AppConfig,
    watch: bool,
    interval_secs: Option<u64>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let teams = TeamDirectory::nfl();
    let feed = EspnClient::new(&cfg.feed, teams.clone())?;
    let mut dashboard = Dashboard::new(cfg, teams.clone());

    if !watch {
        let report = dashboard.poll(&feed, Utc::now()).await;
        return render(&report, &teams, false, mode);
    }

    let secs = interval_secs.unwrap_or(cfg.poll.interval_secs).max(1);
    let interval = Duration::from_secs(secs);
    info!("Watching live games every {}s (Ctrl+C to stop)", secs);

    loop {
        let report = dashboard.poll(&feed, Utc::now()).await;
        if mode == OutputMode::Table {
            println!("\n── {} ──", report.polled_at.format("%H:%M:%S UTC"));
        }
        render(&report, &teams, true, mode)?;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received after {} polls", dashboard.cycles());
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameStatus, Side};
    use crate::strategy::TrackerCache;
    use crate::strategy::{LiveState, SignalFeed};

    #[test]
    fn test_live_row_text() {
        let teams = TeamDirectory::nfl();
        let mut g = GameState::new("Buffalo", "Miami", Utc::now());
        g.status = GameStatus::InProgress;
        g.period = 4;
        g.clock = "1:30".into();
        g.away_score = 17;
        g.home_score = 21;
        g.down = Some(3);
        g.distance = Some(8);
        g.possession = Some(Side::Away);
        g.yards_to_endzone = Some(18);

        let mut trackers = TrackerCache::default();
        let view = LiveGameView {
            signals: SignalFeed::compute(&g, &mut trackers, Utc::now()),
            live_state: LiveState::classify(&g),
            trade_url: String::new(),
            game: g,
        };
        let row = LiveRow::build(&view, &teams, true);

        assert_eq!(row.game, "BUF 17 - 21 MIA");
        assert_eq!(row.time, "Q4 1:30");
        assert_eq!(row.ball, "BUF 3rd & 8");
        assert_eq!(row.field, "RED ZONE");
        assert_eq!(row.clock, "HIGH");
        assert_eq!(row.state, "One Poss / ELEVATED 1-4¢");
        assert_eq!(row.drought, view.signals.drought.to_string());

        // A single poll has no history to report
        let single = LiveRow::build(&view, &teams, false);
        assert_eq!(single.drought, "—");
        assert_eq!(single.momentum, "—");
        assert_eq!(single.clock, "HIGH");
    }

    #[test]
    fn test_ball_text_falls_back() {
        let teams = TeamDirectory::nfl();
        let mut g = GameState::new("Buffalo", "Miami", Utc::now());
        assert_eq!(ball_text(&g, &teams), "—");
        g.possession_text = Some("MIA 35".into());
        assert_eq!(ball_text(&g, &teams), "MIA 35");
    }
}
