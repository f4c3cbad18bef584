//! Per-game signal trackers
//!
//! The scoring-drought and momentum signals need memory across polls.
//! Both trackers are keyed by game key and held in a [`TrackerCache`]
//! that bounds its size and drops finished games after a grace period.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::debug;

use super::signals::{Severity, SignalLabel};
use crate::config::TrackerConfig;

// ── Scoring drought ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DroughtStatus {
    JustScored,
    Tracking,
    Normal,
    Moderate,
    Long,
}

/// Drought label plus the time since the last score change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroughtReading {
    pub status: DroughtStatus,
    /// Whole seconds since the last score; None while only tracking
    pub elapsed_secs: Option<i64>,
}

impl DroughtReading {
    /// Elapsed time as "M:SS", or "—" while tracking
    pub fn elapsed_text(&self) -> String {
        match self.elapsed_secs {
            Some(secs) => format!("{}:{:02}", secs / 60, secs % 60),
            None => "—".to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.status {
            DroughtStatus::JustScored => "JUST SCORED",
            DroughtStatus::Tracking => "TRACKING",
            DroughtStatus::Normal => "NORMAL",
            DroughtStatus::Moderate => "MODERATE",
            DroughtStatus::Long => "LONG",
        }
    }
}

impl SignalLabel for DroughtReading {
    fn severity(&self) -> Severity {
        match self.status {
            DroughtStatus::JustScored | DroughtStatus::Normal => Severity::Low,
            DroughtStatus::Tracking => Severity::Neutral,
            DroughtStatus::Moderate => Severity::Moderate,
            DroughtStatus::Long => Severity::High,
        }
    }
}

impl fmt::Display for DroughtReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            DroughtStatus::Tracking => f.write_str(self.label()),
            _ => write!(f, "{} ({})", self.label(), self.elapsed_text()),
        }
    }
}

/// Last combined score of a game and when it last changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DroughtTracker {
    pub last_total_score: u32,
    pub last_score_at: Option<DateTime<Utc>>,
}

impl DroughtTracker {
    /// Feed the current combined score. The stored total only advances
    /// when the new total exceeds it; a lower total (feed correction)
    /// re-baselines without resetting the drought clock.
    pub fn observe(&mut self, total: u32, now: DateTime<Utc>) -> DroughtReading {
        if total > self.last_total_score {
            self.last_total_score = total;
            self.last_score_at = Some(now);
            return DroughtReading {
                status: DroughtStatus::JustScored,
                elapsed_secs: Some(0),
            };
        }
        if total < self.last_total_score {
            debug!(
                "score total fell from {} to {}, re-baselining",
                self.last_total_score, total
            );
            self.last_total_score = total;
        }

        let Some(last) = self.last_score_at else {
            self.last_score_at = Some(now);
            return DroughtReading {
                status: DroughtStatus::Tracking,
                elapsed_secs: None,
            };
        };

        let secs = (now - last).num_seconds().max(0);
        let status = if secs < 3 * 60 {
            DroughtStatus::Normal
        } else if secs < 6 * 60 {
            DroughtStatus::Moderate
        } else {
            DroughtStatus::Long
        };
        DroughtReading {
            status,
            elapsed_secs: Some(secs),
        }
    }
}

// ── Momentum ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Momentum {
    Advancing,
    Stalled,
    Neutral,
}

impl Momentum {
    pub fn label(&self) -> &'static str {
        match self {
            Momentum::Advancing => "ADVANCING",
            Momentum::Stalled => "STALLED",
            Momentum::Neutral => "NEUTRAL",
        }
    }
}

impl SignalLabel for Momentum {
    fn severity(&self) -> Severity {
        match self {
            Momentum::Advancing => Severity::Low,
            Momentum::Stalled => Severity::High,
            Momentum::Neutral => Severity::Neutral,
        }
    }
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One field-position observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSample {
    pub team: String,
    pub yards_to_endzone: u32,
    pub at: DateTime<Utc>,
}

/// Bounded FIFO of recent field-position samples
#[derive(Debug, Clone)]
pub struct MomentumHistory {
    samples: VecDeque<FieldSample>,
    window: usize,
}

impl MomentumHistory {
    pub fn new(window: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(window + 1),
            window,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &FieldSample> {
        self.samples.iter()
    }

    /// Record a sample when both team and yardage are known, then classify
    /// the last three samples.
    pub fn observe(
        &mut self,
        team: Option<&str>,
        yards_to_endzone: Option<u32>,
        now: DateTime<Utc>,
    ) -> Momentum {
        if let (Some(team), Some(yds)) = (team, yards_to_endzone) {
            self.samples.push_back(FieldSample {
                team: team.to_string(),
                yards_to_endzone: yds,
                at: now,
            });
            while self.samples.len() > self.window {
                self.samples.pop_front();
            }
        }
        self.classify()
    }

    /// Yardage to the end zone is relative to the attacking team, so a
    /// falling value always means the drive is moving forward.
    pub fn classify(&self) -> Momentum {
        if self.samples.len() < 3 {
            return Momentum::Neutral;
        }
        let recent: Vec<&FieldSample> = self.samples.iter().skip(self.samples.len() - 3).collect();
        let first = recent[0];
        let last = recent[2];
        if !recent.iter().all(|s| s.team == first.team) {
            return Momentum::Neutral;
        }

        let start = i64::from(first.yards_to_endzone);
        let end = i64::from(last.yards_to_endzone);
        if end < start - 10 {
            Momentum::Advancing
        } else if end > start + 5 {
            Momentum::Stalled
        } else {
            Momentum::Neutral
        }
    }
}

// ── Cache ───────────────────────────────────────────────────────

/// Both trackers for one game plus cache bookkeeping
#[derive(Debug, Clone)]
pub struct GameTrackers {
    pub drought: DroughtTracker,
    pub momentum: MomentumHistory,
    last_seen: DateTime<Utc>,
    final_since: Option<DateTime<Utc>>,
}

/// Tracker store keyed by game key, bounded by capacity and by how long
/// a finished game may linger.
#[derive(Debug, Clone)]
pub struct TrackerCache {
    entries: HashMap<String, GameTrackers>,
    capacity: usize,
    final_grace: Duration,
    momentum_window: usize,
}

impl TrackerCache {
    pub fn new(cfg: &TrackerConfig) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: cfg.capacity.max(1),
            final_grace: Duration::seconds(cfg.final_grace_secs as i64),
            momentum_window: cfg.momentum_window,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, game_key: &str) -> Option<&GameTrackers> {
        self.entries.get(game_key)
    }

    /// Trackers for a game, created on first use. Touches the entry.
    pub fn entry(&mut self, game_key: &str, now: DateTime<Utc>) -> &mut GameTrackers {
        if !self.entries.contains_key(game_key) && self.entries.len() >= self.capacity {
            self.evict_least_recent();
        }
        let window = self.momentum_window;
        let entry = self
            .entries
            .entry(game_key.to_string())
            .or_insert_with(|| GameTrackers {
                drought: DroughtTracker::default(),
                momentum: MomentumHistory::new(window),
                last_seen: now,
                final_since: None,
            });
        entry.last_seen = now;
        entry
    }

    /// Note that a game has finished. The first call starts its grace period.
    pub fn mark_final(&mut self, game_key: &str, now: DateTime<Utc>) {
        if let Some(entry) = self.entries.get_mut(game_key) {
            entry.final_since.get_or_insert(now);
        }
    }

    /// Drop finished games past the grace period. Returns how many were removed.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let grace = self.final_grace;
        self.entries.retain(|key, entry| match entry.final_since {
            Some(since) if now - since >= grace => {
                debug!("evicting trackers for finished game {}", key);
                false
            }
            _ => true,
        });
        before - self.entries.len()
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_seen)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            debug!("tracker cache full, evicting {}", key);
            self.entries.remove(&key);
        }
    }
}

impl Default for TrackerCache {
    fn default() -> Self {
        Self::new(&TrackerConfig::default())
    }
}
