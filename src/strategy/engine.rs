//! Poll cycle
//!
//! One `Dashboard::poll` fetches the scoreboard and injury report, splits
//! games into live / final / scheduled, computes the live signal feeds and
//! the pre-game edge picks, and housekeeps the tracker cache. Cycles are
//! driven by the caller; nothing here sleeps or spawns.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::edge::{EdgePick, EdgeScorer, SignalTier};
use super::live_state::{FinalResult, LiveState};
use super::signals::SignalFeed;
use super::trackers::TrackerCache;
use crate::adapters::{ScoreFeed, TradeUrlBuilder};
use crate::config::AppConfig;
use crate::domain::{GameState, InjuryReport, Position, PositionView, TeamDirectory};

/// Outcome of one upstream fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum FeedStatus {
    /// Fetch succeeded with this many items
    Ok(usize),
    Unavailable(String),
}

impl FeedStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FeedStatus::Ok(_))
    }
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedStatus::Ok(n) => write!(f, "ok ({n})"),
            FeedStatus::Unavailable(reason) => write!(f, "unavailable: {reason}"),
        }
    }
}

/// Mutable state carried from one poll to the next
#[derive(Debug, Clone, Default)]
pub struct SignalContext {
    pub trackers: TrackerCache,
}

impl SignalContext {
    pub fn new(trackers: TrackerCache) -> Self {
        Self { trackers }
    }
}

/// A live game with its signals
#[derive(Debug, Clone, Serialize)]
pub struct LiveGameView {
    pub game: GameState,
    pub signals: SignalFeed,
    pub live_state: LiveState,
    pub trade_url: String,
}

/// A scheduled game with its edge pick
#[derive(Debug, Clone, Serialize)]
pub struct RankedPick {
    pub game: GameState,
    pub edge: EdgePick,
    pub tier: SignalTier,
    pub trade_url: String,
}

/// Everything one poll produced
#[derive(Debug, Clone, Serialize)]
pub struct PollReport {
    pub polled_at: DateTime<Utc>,
    pub games_status: FeedStatus,
    pub injuries_status: FeedStatus,
    pub games: Vec<GameState>,
    pub live: Vec<LiveGameView>,
    pub finals: Vec<FinalResult>,
    /// All scheduled games, best score first
    pub picks: Vec<RankedPick>,
    /// Tracker entries dropped this cycle
    pub evicted: usize,
}

impl PollReport {
    /// Picks at or above `min_score`, best first
    pub fn ranked_picks(&self, min_score: f64) -> Vec<&RankedPick> {
        self.picks
            .iter()
            .filter(|p| p.edge.score >= min_score)
            .collect()
    }

    pub fn game(&self, game_key: &str) -> Option<&GameState> {
        self.games.iter().find(|g| g.game_key == game_key)
    }

    /// Evaluate each position against this poll's games. A position whose
    /// game is not on the scoreboard comes back as `None`.
    pub fn position_views<'a>(
        &self,
        positions: &'a [Position],
    ) -> Vec<(&'a Position, Option<PositionView>)> {
        positions
            .iter()
            .map(|p| {
                let view = self
                    .game(&p.game_key)
                    .and_then(|g| PositionView::evaluate(p, g));
                (p, view)
            })
            .collect()
    }
}

/// Owns the cross-poll state and the scoring collaborators
pub struct Dashboard {
    context: SignalContext,
    scorer: EdgeScorer,
    urls: TradeUrlBuilder,
    cycles: u64,
}

impl Dashboard {
    pub fn new(config: &AppConfig, teams: TeamDirectory) -> Self {
        Self {
            context: SignalContext::new(TrackerCache::new(&config.trackers)),
            urls: TradeUrlBuilder::new(&config.venue.base_url, teams.clone()),
            scorer: EdgeScorer::new(teams),
            cycles: 0,
        }
    }

    pub fn context(&self) -> &SignalContext {
        &self.context
    }

    pub fn scorer(&self) -> &EdgeScorer {
        &self.scorer
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one poll cycle against `feed`
    pub async fn poll<F>(&mut self, feed: &F, now: DateTime<Utc>) -> PollReport
    where
        F: ScoreFeed + ?Sized,
    {
        self.cycles += 1;

        let (games_res, injuries_res) = tokio::join!(feed.fetch_games(), feed.fetch_injuries());

        let (games, games_status) = match games_res {
            Ok(games) => {
                let n = games.len();
                (games, FeedStatus::Ok(n))
            }
            Err(e) => {
                warn!("scoreboard fetch failed: {}", e);
                (Vec::new(), FeedStatus::Unavailable(e.to_string()))
            }
        };
        let (injuries, injuries_status) = match injuries_res {
            Ok(report) => {
                let n = report.len();
                (report, FeedStatus::Ok(n))
            }
            Err(e) => {
                warn!("injury report fetch failed: {}", e);
                (InjuryReport::new(), FeedStatus::Unavailable(e.to_string()))
            }
        };

        let mut live = Vec::new();
        let mut finals = Vec::new();
        let mut picks = Vec::new();

        for game in &games {
            if game.is_live() {
                live.push(self.live_view(game, now));
            } else if game.is_final() {
                self.context.trackers.mark_final(&game.game_key, now);
                finals.push(FinalResult::from_game(game));
            } else if game.is_scheduled() {
                picks.push(self.rank(game, &injuries));
            }
        }

        picks.sort_by(|a, b| b.edge.score.total_cmp(&a.edge.score));

        let evicted = self.context.trackers.evict_expired(now);
        if evicted > 0 {
            debug!("evicted {} finished games from tracker cache", evicted);
        }

        info!(
            cycle = self.cycles,
            live = live.len(),
            finals = finals.len(),
            scheduled = picks.len(),
            "poll complete"
        );

        PollReport {
            polled_at: now,
            games_status,
            injuries_status,
            games,
            live,
            finals,
            picks,
            evicted,
        }
    }

    fn live_view(&mut self, game: &GameState, now: DateTime<Utc>) -> LiveGameView {
        let signals = SignalFeed::compute(game, &mut self.context.trackers, now);
        LiveGameView {
            game: game.clone(),
            signals,
            live_state: LiveState::classify(game),
            trade_url: self
                .urls
                .trade_url(&game.away_team, &game.home_team, &game.game_date),
        }
    }

    fn rank(&self, game: &GameState, injuries: &InjuryReport) -> RankedPick {
        let edge = self
            .scorer
            .score_matchup(&game.home_team, &game.away_team, injuries);
        RankedPick {
            tier: edge.tier(),
            trade_url: self
                .urls
                .trade_url(&game.away_team, &game.home_team, &game.game_date),
            game: game.clone(),
            edge,
        }
    }
}
