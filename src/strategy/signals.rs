//! Live Signal Calculators
//!
//! Each calculator turns one dimension of a game snapshot into a label and
//! a severity tier. None of them fail: missing or unparseable input maps
//! to an explicit unknown/neutral label.
//!
//! Field pressure, down stress, clock pressure and blowout risk are pure
//! functions of the snapshot. Scoring drought and momentum read and update
//! the per-game trackers (see [`super::trackers`]).

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::trackers::{DroughtReading, Momentum, TrackerCache};
use crate::domain::{GameState, Side};

const SECONDS_PER_QUARTER: u32 = 15 * 60;

/// Severity tier shared by all signals, mapped to a display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neutral,
    Low,
    Mild,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Neutral => "#888888",
            Severity::Low => "#44ff44",
            Severity::Mild => "#ffff00",
            Severity::Moderate => "#ffaa00",
            Severity::High => "#ff8800",
            Severity::Critical => "#ff0000",
        }
    }
}

/// Common surface of every signal label
pub trait SignalLabel: fmt::Display {
    fn severity(&self) -> Severity;

    fn color(&self) -> &'static str {
        self.severity().color()
    }
}

// ── Field pressure ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldPressure {
    RedZone,
    Threat,
    Neutral,
    Low,
    Unknown,
}

impl FieldPressure {
    pub fn label(&self) -> &'static str {
        match self {
            FieldPressure::RedZone => "RED ZONE",
            FieldPressure::Threat => "THREAT",
            FieldPressure::Neutral => "NEUTRAL",
            FieldPressure::Low => "LOW",
            FieldPressure::Unknown => "UNKNOWN",
        }
    }
}

impl SignalLabel for FieldPressure {
    fn severity(&self) -> Severity {
        match self {
            FieldPressure::RedZone => Severity::Critical,
            FieldPressure::Threat => Severity::High,
            FieldPressure::Neutral | FieldPressure::Unknown => Severity::Neutral,
            FieldPressure::Low => Severity::Low,
        }
    }
}

/// Band the distance to the end zone of the team with the ball
pub fn field_pressure(yards_to_endzone: Option<u32>, possession: Option<Side>) -> FieldPressure {
    let (Some(yds), Some(_)) = (yards_to_endzone, possession) else {
        return FieldPressure::Unknown;
    };
    match yds {
        0..=20 => FieldPressure::RedZone,
        21..=35 => FieldPressure::Threat,
        36..=50 => FieldPressure::Neutral,
        _ => FieldPressure::Low,
    }
}

// ── Down stress ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DownStress {
    Easy,
    Normal,
    Favorable,
    Moderate,
    Convertible,
    HighRisk,
    Critical,
    Unknown,
}

impl DownStress {
    pub fn label(&self) -> &'static str {
        match self {
            DownStress::Easy => "EASY",
            DownStress::Normal => "NORMAL",
            DownStress::Favorable => "FAVORABLE",
            DownStress::Moderate => "MODERATE",
            DownStress::Convertible => "CONVERTIBLE",
            DownStress::HighRisk => "HIGH RISK",
            DownStress::Critical => "CRITICAL",
            DownStress::Unknown => "—",
        }
    }
}

impl SignalLabel for DownStress {
    fn severity(&self) -> Severity {
        match self {
            DownStress::Easy | DownStress::Favorable | DownStress::Convertible => Severity::Low,
            DownStress::Normal | DownStress::Unknown => Severity::Neutral,
            DownStress::Moderate => Severity::Moderate,
            DownStress::HighRisk => Severity::High,
            DownStress::Critical => Severity::Critical,
        }
    }
}

/// Classify down and yards-to-go
pub fn down_stress(down: Option<u8>, distance: Option<u32>) -> DownStress {
    let (Some(down), Some(distance)) = (down, distance) else {
        return DownStress::Unknown;
    };
    if distance == 0 {
        return DownStress::Unknown;
    }
    match down {
        1 if distance <= 5 => DownStress::Easy,
        1 => DownStress::Normal,
        2 if distance <= 5 => DownStress::Favorable,
        2 if distance <= 8 => DownStress::Normal,
        2 => DownStress::Moderate,
        3 if distance <= 3 => DownStress::Convertible,
        3 if distance <= 6 => DownStress::Moderate,
        3 => DownStress::HighRisk,
        4 => DownStress::Critical,
        _ => DownStress::Unknown,
    }
}

// ── Clock pressure ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockPressure {
    Overtime,
    Panic,
    High,
    Elevated,
    Moderate,
    Low,
    Unknown,
}

impl ClockPressure {
    pub fn label(&self) -> &'static str {
        match self {
            ClockPressure::Overtime => "OVERTIME",
            ClockPressure::Panic => "PANIC",
            ClockPressure::High => "HIGH",
            ClockPressure::Elevated => "ELEVATED",
            ClockPressure::Moderate => "MODERATE",
            ClockPressure::Low => "LOW",
            ClockPressure::Unknown => "UNKNOWN",
        }
    }
}

impl SignalLabel for ClockPressure {
    fn severity(&self) -> Severity {
        match self {
            ClockPressure::Overtime | ClockPressure::Panic => Severity::Critical,
            ClockPressure::High => Severity::High,
            ClockPressure::Elevated => Severity::Moderate,
            ClockPressure::Moderate => Severity::Mild,
            ClockPressure::Low => Severity::Low,
            ClockPressure::Unknown => Severity::Neutral,
        }
    }
}

/// Parse "MM:SS" (seconds optional) into `(minutes, seconds)`
pub fn parse_clock(clock: &str) -> Option<(u32, u32)> {
    let mut parts = clock.split(':');
    let minutes = parts.next()?.trim().parse().ok()?;
    let seconds = match parts.next() {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };
    Some((minutes, seconds))
}

/// Seconds left in regulation for a period and game clock.
/// `None` when the clock is too large to represent.
pub fn regulation_seconds_remaining(period: u8, minutes: u32, seconds: u32) -> Option<u32> {
    let quarters_left = 4u32.saturating_sub(u32::from(period));
    (quarters_left * SECONDS_PER_QUARTER)
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Time pressure on the game, sharper when the side with the ball trails
pub fn clock_pressure(
    period: u8,
    clock: &str,
    margin: u32,
    possession_trailing: bool,
) -> ClockPressure {
    if period >= 5 {
        return ClockPressure::Overtime;
    }
    let Some((minutes, seconds)) = parse_clock(clock) else {
        return ClockPressure::Unknown;
    };
    let Some(remaining) = regulation_seconds_remaining(period, minutes, seconds) else {
        return ClockPressure::Unknown;
    };

    if possession_trailing {
        if period == 4 && remaining <= 5 * 60 && margin > 8 {
            return ClockPressure::Panic;
        } else if period == 4 && remaining <= 10 * 60 {
            return ClockPressure::High;
        } else if period >= 3 {
            return ClockPressure::Elevated;
        }
    }

    if period == 4 && remaining <= 5 * 60 {
        ClockPressure::High
    } else if period == 4 {
        ClockPressure::Elevated
    } else if period == 3 && minutes <= 7 {
        ClockPressure::Moderate
    } else {
        ClockPressure::Low
    }
}

// ── Blowout risk ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlowoutRisk {
    Low,
    Moderate,
    High,
    Blowout,
}

impl BlowoutRisk {
    pub fn label(&self) -> &'static str {
        match self {
            BlowoutRisk::Low => "LOW",
            BlowoutRisk::Moderate => "MODERATE",
            BlowoutRisk::High => "HIGH",
            BlowoutRisk::Blowout => "BLOWOUT",
        }
    }
}

impl SignalLabel for BlowoutRisk {
    fn severity(&self) -> Severity {
        match self {
            BlowoutRisk::Low => Severity::Low,
            BlowoutRisk::Moderate => Severity::Moderate,
            BlowoutRisk::High => Severity::High,
            BlowoutRisk::Blowout => Severity::Critical,
        }
    }
}

/// Classify the score margin against period-dependent thresholds
pub fn blowout_risk(margin: u32, period: u8) -> BlowoutRisk {
    match period {
        0..=2 if margin >= 21 => BlowoutRisk::Moderate,
        0..=2 => BlowoutRisk::Low,
        3 if margin >= 24 => BlowoutRisk::High,
        3 if margin >= 17 => BlowoutRisk::Moderate,
        3 => BlowoutRisk::Low,
        _ if margin >= 17 => BlowoutRisk::Blowout,
        _ if margin >= 14 => BlowoutRisk::High,
        _ if margin >= 9 => BlowoutRisk::Moderate,
        _ => BlowoutRisk::Low,
    }
}

macro_rules! display_via_label {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )+
    };
}

display_via_label!(FieldPressure, DownStress, ClockPressure, BlowoutRisk);

// ── Signal feed ─────────────────────────────────────────────────

/// One rendered signal: label text plus its severity and color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReading {
    pub label: String,
    pub severity: Severity,
    pub color: &'static str,
}

impl SignalReading {
    pub fn of<L: SignalLabel>(signal: &L) -> Self {
        Self {
            label: signal.to_string(),
            severity: signal.severity(),
            color: signal.color(),
        }
    }
}

/// All six signals for one live game at one poll
#[derive(Debug, Clone, Serialize)]
pub struct SignalFeed {
    pub game_key: String,
    pub field: FieldPressure,
    pub down: DownStress,
    pub clock: ClockPressure,
    pub drought: DroughtReading,
    pub blowout: BlowoutRisk,
    pub momentum: Momentum,
}

impl SignalFeed {
    /// Compute every signal for a game. Updates the game's drought and
    /// momentum trackers exactly once.
    pub fn compute(game: &GameState, trackers: &mut TrackerCache, now: DateTime<Utc>) -> Self {
        let margin = game.margin();
        let entry = trackers.entry(&game.game_key, now);
        let drought = entry.drought.observe(game.total(), now);
        let momentum =
            entry
                .momentum
                .observe(game.possession_team(), game.yards_to_endzone, now);

        Self {
            game_key: game.game_key.clone(),
            field: field_pressure(game.yards_to_endzone, game.possession),
            down: down_stress(game.down, game.distance),
            clock: clock_pressure(game.period, &game.clock, margin, game.possession_trailing()),
            drought,
            blowout: blowout_risk(margin, game.period),
            momentum,
        }
    }

    /// Readings in display order
    pub fn readings(&self) -> [(&'static str, SignalReading); 6] {
        [
            ("Field", SignalReading::of(&self.field)),
            ("Down", SignalReading::of(&self.down)),
            ("Clock", SignalReading::of(&self.clock)),
            ("Drought", SignalReading::of(&self.drought)),
            ("Blowout", SignalReading::of(&self.blowout)),
            ("Momentum", SignalReading::of(&self.momentum)),
        ]
    }

    /// Highest severity across the feed
    pub fn peak_severity(&self) -> Severity {
        self.readings()
            .iter()
            .map(|(_, r)| r.severity)
            .max()
            .unwrap_or(Severity::Neutral)
    }
}
