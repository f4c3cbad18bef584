//! Signal and scoring layer
//!
//! - `signals` / `trackers` - per-play live signals and the per-game state behind them
//! - `live_state` - possession pressure and uncertainty band for live games
//! - `edge` - pre-game matchup scoring and confidence tiers
//! - `engine` - the poll cycle tying feed, signals and picks together

pub mod edge;
pub mod engine;
pub mod live_state;
pub mod signals;
pub mod trackers;

pub use edge::{evaluate_injuries, EdgePick, EdgeScorer, InjuryImpact, SignalTier};
pub use engine::{Dashboard, FeedStatus, LiveGameView, PollReport, RankedPick, SignalContext};
pub use live_state::{FinalResult, LiveState, PossessionPressure, UncertaintyBand};
pub use signals::{
    blowout_risk, clock_pressure, down_stress, field_pressure, parse_clock, BlowoutRisk,
    ClockPressure, DownStress, FieldPressure, Severity, SignalFeed, SignalLabel, SignalReading,
};
pub use trackers::{
    DroughtReading, DroughtStatus, DroughtTracker, GameTrackers, Momentum, MomentumHistory,
    TrackerCache,
};
