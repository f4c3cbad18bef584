use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Mutex;

use nfl_edge::adapters::{parse_injuries, parse_scoreboard, JsonPositionStore, PositionBook, ScoreFeed};
use nfl_edge::config::AppConfig;
use nfl_edge::domain::{GameState, InjuryReport, Position, PositionStatus, TeamDirectory};
use nfl_edge::error::{EdgeError, Result};
use nfl_edge::strategy::{Dashboard, FeedStatus, SignalTier};

/// Feed that serves whatever payloads the test last installed
struct ScriptedFeed {
    teams: TeamDirectory,
    scoreboard: Mutex<String>,
    injuries: Mutex<String>,
}

impl ScriptedFeed {
    fn new(scoreboard: Value, injuries: Value) -> Self {
        Self {
            teams: TeamDirectory::nfl(),
            scoreboard: Mutex::new(scoreboard.to_string()),
            injuries: Mutex::new(injuries.to_string()),
        }
    }

    fn set_scoreboard(&self, scoreboard: Value) {
        *self.scoreboard.lock().unwrap() = scoreboard.to_string();
    }
}

#[async_trait]
impl ScoreFeed for ScriptedFeed {
    async fn fetch_games(&self) -> Result<Vec<GameState>> {
        let body = self.scoreboard.lock().unwrap().clone();
        parse_scoreboard(&body, &self.teams, Utc::now())
    }

    async fn fetch_injuries(&self) -> Result<InjuryReport> {
        let body = self.injuries.lock().unwrap().clone();
        parse_injuries(&body, &self.teams)
    }
}

struct DownFeed;

#[async_trait]
impl ScoreFeed for DownFeed {
    async fn fetch_games(&self) -> Result<Vec<GameState>> {
        Err(EdgeError::FeedUnavailable("connection refused".into()))
    }

    async fn fetch_injuries(&self) -> Result<InjuryReport> {
        Err(EdgeError::FeedUnavailable("connection refused".into()))
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 9, 20, 0, 0).unwrap()
}

/// (down, distance, yards to end zone, possession team id)
type Situation = (i64, i64, i64, &'static str);

#[allow(clippy::too_many_arguments)]
fn event(
    id: &str,
    away: &str,
    home: &str,
    scores: (u32, u32),
    period: u8,
    clock: &str,
    name: &str,
    state: &str,
    situation: Option<Situation>,
) -> Value {
    let mut competition = json!({
        "competitors": [
            {"homeAway": "home", "score": scores.1.to_string(), "team": {"id": "2", "displayName": home}},
            {"homeAway": "away", "score": scores.0.to_string(), "team": {"id": "1", "displayName": away}}
        ]
    });
    if let Some((down, distance, yds, possession)) = situation {
        competition["situation"] = json!({
            "down": down,
            "distance": distance,
            "yardsToEndzone": yds,
            "possession": possession,
        });
    }
    json!({
        "id": id,
        "date": "2025-11-09T18:00Z",
        "status": {
            "displayClock": clock,
            "period": period,
            "type": {"name": name, "state": state}
        },
        "competitions": [competition]
    })
}

fn bills_dolphins(scores: (u32, u32), clock: &str, situation: Situation) -> Value {
    event(
        "1",
        "Buffalo Bills",
        "Miami Dolphins",
        scores,
        4,
        clock,
        "STATUS_IN_PROGRESS",
        "in",
        Some(situation),
    )
}

fn slate(live: Value) -> Value {
    json!({
        "events": [
            live,
            event("2", "New York Giants", "Kansas City Chiefs", (0, 0), 0, "15:00", "STATUS_SCHEDULED", "pre", None),
            event("3", "Dallas Cowboys", "Philadelphia Eagles", (20, 27), 4, "0:00", "STATUS_FINAL", "post", None),
        ]
    })
}

fn giants_qb_out() -> Value {
    json!({
        "injuries": [{
            "displayName": "New York Giants",
            "injuries": [{
                "status": "Out",
                "athlete": {"displayName": "Russell Wilson", "position": {"abbreviation": "QB"}}
            }]
        }]
    })
}

fn dashboard() -> Dashboard {
    Dashboard::new(&AppConfig::default_config(), TeamDirectory::nfl())
}

#[tokio::test]
async fn drive_signals_evolve_across_polls() {
    let feed = ScriptedFeed::new(
        slate(bills_dolphins((17, 27), "3:00", (3, 2, 45, "1"))),
        giants_qb_out(),
    );
    let mut dash = dashboard();

    let first = dash.poll(&feed, t0()).await;
    assert_eq!(first.games_status, FeedStatus::Ok(3));
    assert_eq!(first.live.len(), 1);
    let live = &first.live[0];
    assert_eq!(live.game.game_key, "Buffalo@Miami");
    assert_eq!(live.signals.field.to_string(), "NEUTRAL");
    assert_eq!(live.signals.down.to_string(), "CONVERTIBLE");
    assert_eq!(live.signals.clock.to_string(), "PANIC");
    assert_eq!(live.signals.drought.label(), "JUST SCORED");
    assert_eq!(live.signals.momentum.to_string(), "NEUTRAL");
    assert_eq!(live.live_state.possession.to_string(), "Two Poss");

    feed.set_scoreboard(slate(bills_dolphins((17, 27), "2:10", (1, 10, 30, "1"))));
    dash.poll(&feed, t0() + Duration::seconds(60)).await;

    feed.set_scoreboard(slate(bills_dolphins((17, 27), "1:20", (2, 4, 12, "1"))));
    let third = dash.poll(&feed, t0() + Duration::seconds(120)).await;
    let live = &third.live[0];
    assert_eq!(live.signals.field.to_string(), "RED ZONE");
    assert_eq!(live.signals.momentum.to_string(), "ADVANCING");
    assert_eq!(live.signals.drought.to_string(), "NORMAL (2:00)");

    // Touchdown, Miami takes over deep in its own end
    feed.set_scoreboard(slate(bills_dolphins((24, 27), "1:10", (1, 10, 75, "2"))));
    let fourth = dash.poll(&feed, t0() + Duration::seconds(200)).await;
    let live = &fourth.live[0];
    assert_eq!(live.signals.drought.label(), "JUST SCORED");
    assert_eq!(live.signals.momentum.to_string(), "NEUTRAL");
    assert_eq!(live.live_state.possession.to_string(), "One Poss");
    assert_eq!(dash.context().trackers.get("Buffalo@Miami").unwrap().momentum.len(), 4);
}

#[tokio::test]
async fn scheduled_games_become_ranked_picks() {
    let feed = ScriptedFeed::new(
        slate(bills_dolphins((17, 27), "3:00", (3, 2, 45, "1"))),
        giants_qb_out(),
    );
    let report = dashboard().poll(&feed, t0()).await;

    assert_eq!(report.injuries_status, FeedStatus::Ok(1));
    assert_eq!(report.picks.len(), 1);
    let pick = &report.picks[0];
    assert_eq!(pick.edge.pick, "Kansas City");
    assert_eq!(pick.tier, SignalTier::StrongBuy);
    assert!(pick.edge.reasons.contains(&"🏥 QB Out".to_string()));
    assert_eq!(pick.edge.away_out, vec!["🚨 Russell Wilson (QB)".to_string()]);
    assert_eq!(
        pick.trade_url,
        "https://kalshi.com/markets/KXNFLGAME/KXNFLGAME-25NOV09NYGKC"
    );
    assert_eq!(report.ranked_picks(5.5).len(), 1);

    assert_eq!(report.finals.len(), 1);
    assert_eq!(report.finals[0].winner, "Philadelphia");
}

#[tokio::test]
async fn unavailable_feed_yields_empty_report() {
    let report = dashboard().poll(&DownFeed, t0()).await;

    assert!(matches!(report.games_status, FeedStatus::Unavailable(_)));
    assert!(matches!(report.injuries_status, FeedStatus::Unavailable(_)));
    assert!(report.games.is_empty());
    assert!(report.live.is_empty());
    assert!(report.finals.is_empty());
    assert!(report.picks.is_empty());
}

#[tokio::test]
async fn stored_positions_track_live_games() {
    let path = std::env::temp_dir()
        .join(format!("nfl-edge-it-{}", uuid::Uuid::new_v4()))
        .join("positions.json");

    let mut book = PositionBook::open(JsonPositionStore::new(&path)).await.unwrap();
    book.add(Position::new("Buffalo@Miami", "Miami", 60, 5, t0()).unwrap())
        .await
        .unwrap();
    book.add(Position::new("Dallas@Philadelphia", "Dallas", 35, 4, t0()).unwrap())
        .await
        .unwrap();
    book.add(Position::new("Detroit@Chicago", "Detroit", 50, 1, t0()).unwrap())
        .await
        .unwrap();

    let feed = ScriptedFeed::new(
        slate(bills_dolphins((17, 27), "3:00", (3, 2, 45, "1"))),
        json!({"injuries": []}),
    );
    let report = dashboard().poll(&feed, t0()).await;

    let reopened = PositionBook::open(JsonPositionStore::new(&path)).await.unwrap();
    let views = report.position_views(reopened.positions());

    let miami = views[0].1.as_ref().unwrap();
    assert_eq!(miami.status, PositionStatus::Leading);
    assert_eq!(miami.lead, 10);

    let dallas = views[1].1.as_ref().unwrap();
    assert_eq!(dallas.status, PositionStatus::Lost);
    assert_eq!(dallas.realized_pnl, Some(-dallas.cost));

    assert!(views[2].1.is_none());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
