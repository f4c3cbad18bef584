//! ESPN NFL Scoreboard Client
//!
//! Fetches the NFL scoreboard and injury report from ESPN's public API
//! and normalizes them into [`GameState`] snapshots and an [`InjuryReport`].
//! No API key required.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::FeedConfig;
use crate::domain::{
    game_key, GameState, GameStatus, InjuryRecord, InjuryReport, Side, TeamDirectory,
};
use crate::error::{EdgeError, Result};

/// Source of game snapshots and injury reports
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreFeed: Send + Sync {
    /// Every game on the current scoreboard, normalized
    async fn fetch_games(&self) -> Result<Vec<GameState>>;

    /// Injury lists keyed by canonical team name
    async fn fetch_injuries(&self) -> Result<InjuryReport>;
}

// ── ESPN JSON deserialization structs ────────────────────────────

/// Events stay raw so one malformed record cannot sink the slate
#[derive(Debug, Deserialize)]
pub(crate) struct EspnScoreboard {
    #[serde(default)]
    events: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EspnEvent {
    #[serde(default)]
    id: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    competitions: Vec<EspnCompetition>,
    #[serde(default)]
    status: Option<EspnStatus>,
}

#[derive(Debug, Deserialize)]
struct EspnCompetition {
    #[serde(default)]
    competitors: Vec<EspnCompetitor>,
    #[serde(default)]
    situation: Option<EspnSituation>,
    #[serde(default)]
    status: Option<EspnStatus>,
}

#[derive(Debug, Deserialize)]
struct EspnCompetitor {
    #[serde(default)]
    team: Option<EspnTeam>,
    #[serde(rename = "homeAway", default)]
    home_away: String,
    /// Usually a string, occasionally a bare number
    #[serde(default)]
    score: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct EspnTeam {
    #[serde(default)]
    id: String,
    #[serde(rename = "displayName", default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct EspnSituation {
    #[serde(default)]
    down: Option<i64>,
    #[serde(default)]
    distance: Option<i64>,
    #[serde(rename = "yardsToEndzone", default)]
    yards_to_endzone: Option<i64>,
    #[serde(default)]
    possession: Option<String>,
    #[serde(rename = "isRedZone", default)]
    is_red_zone: bool,
    #[serde(rename = "possessionText", default)]
    possession_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EspnStatus {
    #[serde(rename = "displayClock", default)]
    display_clock: Option<String>,
    #[serde(default)]
    period: Option<u8>,
    #[serde(rename = "type", default)]
    status_type: Option<EspnStatusType>,
}

#[derive(Debug, Deserialize)]
struct EspnStatusType {
    #[serde(default)]
    name: String,
    #[serde(default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct EspnInjuryResponse {
    #[serde(default)]
    injuries: Vec<EspnTeamInjuries>,
}

#[derive(Debug, Deserialize)]
struct EspnTeamInjuries {
    #[serde(rename = "displayName", default)]
    display_name: String,
    #[serde(default)]
    injuries: Vec<EspnInjury>,
}

#[derive(Debug, Deserialize)]
struct EspnInjury {
    #[serde(default)]
    status: String,
    #[serde(default)]
    athlete: Option<EspnAthlete>,
}

#[derive(Debug, Deserialize)]
struct EspnAthlete {
    #[serde(rename = "displayName", default)]
    display_name: String,
    #[serde(default)]
    position: Option<EspnPosition>,
}

#[derive(Debug, Deserialize)]
struct EspnPosition {
    #[serde(default)]
    abbreviation: String,
}

// ── Normalization ───────────────────────────────────────────────

/// Parse a scoreboard payload into game snapshots, skipping events that
/// fail to deserialize or do not carry two competitors.
pub fn parse_scoreboard(json: &str, teams: &TeamDirectory, now: DateTime<Utc>) -> Result<Vec<GameState>> {
    let data: EspnScoreboard = serde_json::from_str(json)?;
    Ok(data
        .events
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<EspnEvent>(raw) {
            Ok(event) => normalize_event(&event, teams, now),
            Err(e) => {
                warn!("ESPN: skipping malformed event: {}", e);
                None
            }
        })
        .collect())
}

/// Score as sent by the feed, 0 when missing or unreadable
fn parse_score(raw: Option<&serde_json::Value>) -> u32 {
    match raw {
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Parse an injuries payload. Entries without a player name are dropped.
pub fn parse_injuries(json: &str, teams: &TeamDirectory) -> Result<InjuryReport> {
    let data: EspnInjuryResponse = serde_json::from_str(json)?;
    let mut report = InjuryReport::new();
    for team in data.injuries {
        if team.display_name.is_empty() {
            continue;
        }
        let records = team
            .injuries
            .into_iter()
            .filter_map(|inj| {
                let athlete = inj.athlete?;
                if athlete.display_name.is_empty() {
                    return None;
                }
                Some(InjuryRecord {
                    player_name: athlete.display_name,
                    status: inj.status,
                    position: athlete
                        .position
                        .map(|p| p.abbreviation)
                        .unwrap_or_default(),
                })
            })
            .collect();
        report.insert(teams.canonical_name(&team.display_name), records);
    }
    Ok(report)
}

/// Map one ESPN event onto the internal game shape
pub(crate) fn normalize_event(
    event: &EspnEvent,
    teams: &TeamDirectory,
    now: DateTime<Utc>,
) -> Option<GameState> {
    let comp = event.competitions.first()?;
    if comp.competitors.len() < 2 {
        return None;
    }

    let mut home: Option<(String, String, u32)> = None;
    let mut away: Option<(String, String, u32)> = None;
    for c in &comp.competitors {
        let (name, id) = match &c.team {
            Some(t) => (teams.canonical_name(&t.display_name), t.id.clone()),
            None => (String::new(), String::new()),
        };
        let score = parse_score(c.score.as_ref());
        if c.home_away == "home" {
            home = Some((name, id, score));
        } else {
            away = Some((name, id, score));
        }
    }
    let (home_team, home_id, home_score) = home?;
    let (away_team, away_id, away_score) = away?;

    let status = event.status.as_ref().or(comp.status.as_ref());
    let period = status.and_then(|s| s.period).unwrap_or(0);
    let clock = status
        .and_then(|s| s.display_clock.clone())
        .unwrap_or_default();
    let status_kind = map_status(status.and_then(|s| s.status_type.as_ref()), period);

    let situation = comp.situation.as_ref();
    let down = situation
        .and_then(|s| s.down)
        .filter(|d| (1..=4).contains(d))
        .map(|d| d as u8);
    let distance = situation
        .and_then(|s| s.distance)
        .filter(|d| *d > 0)
        .map(|d| d as u32);
    let yards_to_endzone = situation
        .and_then(|s| s.yards_to_endzone)
        .filter(|y| (0..=100).contains(y))
        .map(|y| y as u32);

    let possession = situation
        .and_then(|s| s.possession.as_deref())
        .and_then(|id| resolve_possession(id, &home_id, &away_id));

    let ball_yard = ball_yard(yards_to_endzone, possession);

    let game_date = event
        .date
        .as_deref()
        .and_then(parse_event_date)
        .unwrap_or(now);

    Some(GameState {
        game_key: game_key(&away_team, &home_team),
        event_id: event.id.clone(),
        away_team,
        home_team,
        away_score,
        home_score,
        period,
        clock,
        status: status_kind,
        down,
        distance,
        yards_to_endzone,
        possession,
        possession_text: situation
            .and_then(|s| s.possession_text.clone())
            .filter(|t| !t.is_empty()),
        ball_yard,
        is_red_zone: situation.map(|s| s.is_red_zone).unwrap_or(false),
        game_date,
    })
}

fn map_status(status_type: Option<&EspnStatusType>, period: u8) -> GameStatus {
    let Some(st) = status_type else {
        return GameStatus::Scheduled;
    };
    match st.name.as_str() {
        "STATUS_FINAL" => GameStatus::Final,
        "STATUS_SCHEDULED" => GameStatus::Scheduled,
        _ if period > 0 => GameStatus::InProgress,
        _ => match st.state.as_str() {
            "post" => GameStatus::Final,
            "in" => GameStatus::InProgress,
            _ => GameStatus::Scheduled,
        },
    }
}

/// Resolve the feed's possession identifier against the two team ids
fn resolve_possession(id: &str, home_id: &str, away_id: &str) -> Option<Side> {
    if id.is_empty() {
        None
    } else if id == home_id {
        Some(Side::Home)
    } else if id == away_id {
        Some(Side::Away)
    } else {
        None
    }
}

/// Absolute field position (0 = away end zone, 100 = home end zone).
/// Midfield when yardage or possession is unknown.
pub fn ball_yard(yards_to_endzone: Option<u32>, possession: Option<Side>) -> u32 {
    match (yards_to_endzone, possession) {
        (Some(yds), Some(Side::Home)) => yds,
        (Some(yds), Some(Side::Away)) => 100u32.saturating_sub(yds),
        _ => 50,
    }
}

/// ESPN dates come as full RFC 3339 or the short "2025-11-09T18:00Z"
fn parse_event_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

// ── Client ──────────────────────────────────────────────────────

/// ESPN scoreboard + injuries client
pub struct EspnClient {
    http: reqwest::Client,
    scoreboard_url: String,
    injuries_url: String,
    teams: TeamDirectory,
}

impl EspnClient {
    pub fn new(cfg: &FeedConfig, teams: TeamDirectory) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            scoreboard_url: cfg.scoreboard_url.clone(),
            injuries_url: cfg.injuries_url.clone(),
            teams,
        })
    }

    async fn get_text(&self, url: &str, what: &str) -> anyhow::Result<String> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("ESPN {what} request failed"))?
            .error_for_status()
            .with_context(|| format!("ESPN {what} returned an error status"))?;
        let body = resp
            .text()
            .await
            .with_context(|| format!("ESPN {what} body read failed"))?;
        Ok(body)
    }
}

#[async_trait]
impl ScoreFeed for EspnClient {
    async fn fetch_games(&self) -> Result<Vec<GameState>> {
        let body = self
            .get_text(&self.scoreboard_url, "scoreboard")
            .await
            .map_err(|e| EdgeError::FeedUnavailable(format!("{e:#}")))?;
        let games = parse_scoreboard(&body, &self.teams, Utc::now())?;
        debug!("ESPN: fetched {} games", games.len());
        Ok(games)
    }

    async fn fetch_injuries(&self) -> Result<InjuryReport> {
        let body = self
            .get_text(&self.injuries_url, "injuries")
            .await
            .map_err(|e| EdgeError::FeedUnavailable(format!("{e:#}")))?;
        let report = parse_injuries(&body, &self.teams)?;
        if report.is_empty() {
            warn!("ESPN: injury report is empty");
        } else {
            debug!("ESPN: fetched injuries for {} teams", report.len());
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SCOREBOARD: &str = r#"{
        "events": [
            {
                "id": "401772938",
                "date": "2025-11-09T18:00Z",
                "status": {
                    "displayClock": "4:30",
                    "period": 4,
                    "type": {"name": "STATUS_IN_PROGRESS", "state": "in"}
                },
                "competitions": [{
                    "competitors": [
                        {"homeAway": "home", "score": "17",
                         "team": {"id": "15", "displayName": "Miami Dolphins"}},
                        {"homeAway": "away", "score": "27",
                         "team": {"id": "2", "displayName": "Buffalo Bills"}}
                    ],
                    "situation": {
                        "down": 3, "distance": 2, "yardsToEndzone": 15,
                        "possession": "15", "isRedZone": true,
                        "possessionText": "BUF 15"
                    }
                }]
            },
            {
                "id": "401772939",
                "date": "2025-11-09T21:25Z",
                "status": {
                    "displayClock": "0:00",
                    "period": 0,
                    "type": {"name": "STATUS_SCHEDULED", "state": "pre"}
                },
                "competitions": [{
                    "competitors": [
                        {"homeAway": "home", "team": {"id": "12", "displayName": "Kansas City Chiefs"}},
                        {"homeAway": "away", "team": {"id": "7", "displayName": "Denver Broncos"}}
                    ]
                }]
            },
            {
                "id": "bye",
                "competitions": [{
                    "competitors": [
                        {"homeAway": "home", "team": {"id": "1", "displayName": "Atlanta Falcons"}}
                    ]
                }]
            }
        ]
    }"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 9, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_scoreboard() {
        let teams = TeamDirectory::nfl();
        let games = parse_scoreboard(SCOREBOARD, &teams, now()).unwrap();
        // The single-competitor event is skipped
        assert_eq!(games.len(), 2);

        let live = &games[0];
        assert_eq!(live.game_key, "Buffalo@Miami");
        assert_eq!(live.home_score, 17);
        assert_eq!(live.away_score, 27);
        assert_eq!(live.period, 4);
        assert_eq!(live.clock, "4:30");
        assert_eq!(live.status, GameStatus::InProgress);
        assert_eq!(live.down, Some(3));
        assert_eq!(live.distance, Some(2));
        assert_eq!(live.yards_to_endzone, Some(15));
        assert_eq!(live.possession, Some(Side::Home));
        assert_eq!(live.ball_yard, 15);
        assert!(live.is_red_zone);
        assert_eq!(
            live.game_date,
            Utc.with_ymd_and_hms(2025, 11, 9, 18, 0, 0).unwrap()
        );

        let scheduled = &games[1];
        assert_eq!(scheduled.game_key, "Denver@Kansas City");
        assert_eq!(scheduled.status, GameStatus::Scheduled);
        assert_eq!(scheduled.home_score, 0);
        assert!(scheduled.possession.is_none());
        assert_eq!(scheduled.ball_yard, 50);
    }

    #[test]
    fn test_unknown_possession_id_is_absent() {
        assert_eq!(resolve_possession("99", "15", "2"), None);
        assert_eq!(resolve_possession("", "", "2"), None);
        assert_eq!(resolve_possession("2", "15", "2"), Some(Side::Away));
    }

    #[test]
    fn test_ball_yard_derivation() {
        assert_eq!(ball_yard(Some(30), Some(Side::Home)), 30);
        assert_eq!(ball_yard(Some(30), Some(Side::Away)), 70);
        assert_eq!(ball_yard(None, Some(Side::Away)), 50);
        assert_eq!(ball_yard(Some(30), None), 50);
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let json = r#"{"events": [{
            "id": "1",
            "date": "not a date",
            "competitions": [{
                "competitors": [
                    {"homeAway": "home", "score": "abc", "team": {"id": "1", "displayName": "Atlanta Falcons"}},
                    {"homeAway": "away", "team": {"id": "2", "displayName": "Carolina Panthers"}}
                ],
                "situation": {"down": -1, "distance": 0, "yardsToEndzone": 140}
            }]
        }]}"#;
        let games = parse_scoreboard(json, &TeamDirectory::nfl(), now()).unwrap();
        let g = &games[0];
        assert_eq!(g.home_score, 0);
        assert_eq!(g.period, 0);
        assert_eq!(g.clock, "");
        assert_eq!(g.status, GameStatus::Scheduled);
        assert!(g.down.is_none());
        assert!(g.distance.is_none());
        assert!(g.yards_to_endzone.is_none());
        assert_eq!(g.game_date, now());
    }

    #[test]
    fn test_one_bad_event_keeps_the_rest() {
        let json = r#"{"events": [
            {
                "id": "1",
                "status": {"period": 2, "type": {"name": "STATUS_IN_PROGRESS", "state": "in"}},
                "competitions": [{
                    "competitors": [
                        {"homeAway": "home", "score": "10", "team": {"id": "1", "displayName": "Atlanta Falcons"}},
                        {"homeAway": "away", "score": "7", "team": {"id": "2", "displayName": "Carolina Panthers"}}
                    ]
                }]
            },
            {
                "id": "2",
                "status": {"period": 1, "type": {"name": "STATUS_IN_PROGRESS", "state": "in"}},
                "competitions": [{
                    "competitors": [
                        {"homeAway": "home", "score": 3, "team": {"id": "3", "displayName": "Chicago Bears"}},
                        {"homeAway": "away", "score": "0", "team": {"id": "4", "displayName": "Detroit Lions"}}
                    ]
                }]
            },
            {
                "id": "3",
                "status": {"period": 900, "type": {"name": "STATUS_IN_PROGRESS", "state": "in"}},
                "competitions": [{
                    "competitors": [
                        {"homeAway": "home", "team": {"id": "5", "displayName": "Green Bay Packers"}},
                        {"homeAway": "away", "team": {"id": "6", "displayName": "Minnesota Vikings"}}
                    ]
                }]
            }
        ]}"#;
        let games = parse_scoreboard(json, &TeamDirectory::nfl(), now()).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].home_score, 10);
        // Numeric scores are read as-is
        assert_eq!(games[1].game_key, "Detroit@Chicago");
        assert_eq!(games[1].home_score, 3);
    }

    #[test]
    fn test_parse_score_variants() {
        assert_eq!(parse_score(Some(&serde_json::json!("21"))), 21);
        assert_eq!(parse_score(Some(&serde_json::json!(14))), 14);
        assert_eq!(parse_score(Some(&serde_json::json!(-3))), 0);
        assert_eq!(parse_score(Some(&serde_json::json!(null))), 0);
        assert_eq!(parse_score(None), 0);
    }

    #[test]
    fn test_status_mapping_order() {
        let st = EspnStatusType {
            name: "STATUS_END_PERIOD".into(),
            state: "post".into(),
        };
        // A running period wins over the state field
        assert_eq!(map_status(Some(&st), 4), GameStatus::InProgress);
        assert_eq!(map_status(Some(&st), 0), GameStatus::Final);
        let halftime = EspnStatusType {
            name: "STATUS_HALFTIME".into(),
            state: "".into(),
        };
        assert_eq!(map_status(Some(&halftime), 2), GameStatus::InProgress);
        assert_eq!(map_status(None, 0), GameStatus::Scheduled);
    }

    #[test]
    fn test_parse_injuries() {
        let json = r#"{"injuries": [
            {"displayName": "Kansas City Chiefs", "injuries": [
                {"status": "Out", "athlete": {"displayName": "Patrick Mahomes", "position": {"abbreviation": "QB"}}},
                {"status": "Questionable", "athlete": {"displayName": "", "position": {"abbreviation": "WR"}}},
                {"status": "Out"}
            ]},
            {"displayName": "", "injuries": []}
        ]}"#;
        let report = parse_injuries(json, &TeamDirectory::nfl()).unwrap();
        assert_eq!(report.len(), 1);
        let kc = &report["Kansas City"];
        assert_eq!(kc.len(), 1);
        assert_eq!(kc[0], InjuryRecord::new("Patrick Mahomes", "Out", "QB"));
    }
}
