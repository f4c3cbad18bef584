//! Pre-Game Edge Scoring
//!
//! Additive heuristic over static team stats and the current injury report:
//! each side collects points for an offensive edge, a top-5 defense,
//! home field, an opposing QB ruled out and a strong home record. The
//! points are normalized to a 0-10 confidence for the stronger side.
//!
//! This is a hand-tuned ranking aid, not a win probability.

use serde::Serialize;
use tracing::debug;

use crate::domain::{InjuryReport, Side, TeamDirectory};

const OFFENSE_EDGE_THRESHOLD: f64 = 8.0;
const OFFENSE_EDGE_POINTS: f64 = 1.0;
const TOP_DEFENSE_RANK: u8 = 5;
const TOP_DEFENSE_POINTS: f64 = 1.0;
const HOME_FIELD_POINTS: f64 = 1.0;
const QB_OUT_POINTS: f64 = 2.5;
const STRONG_HOME_RATE: f64 = 0.65;
const STRONG_HOME_POINTS: f64 = 0.8;
const MAX_REASONS: usize = 4;

const QB_OUT_IMPACT: f64 = 5.0;
const STAR_OUT_IMPACT: f64 = 2.0;

/// How much a team's injury list hurts it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InjuryImpact {
    /// Weighted severity (QB 5.0, star 2.0). Reported but not used for scoring.
    pub impact: f64,
    /// Display strings for ruled-out QBs and stars
    pub out_players: Vec<String>,
    pub qb_out: bool,
}

/// Scan one team's injuries for ruled-out quarterbacks and stars
pub fn evaluate_injuries(team: &str, injuries: &InjuryReport, teams: &TeamDirectory) -> InjuryImpact {
    let mut result = InjuryImpact::default();
    let Some(records) = injuries.get(team) else {
        return result;
    };
    let stars: Vec<String> = teams.stars(team).iter().map(|s| s.to_lowercase()).collect();

    for inj in records {
        if !inj.status.to_uppercase().contains("OUT") {
            continue;
        }
        if inj.position.eq_ignore_ascii_case("QB") {
            result.impact += QB_OUT_IMPACT;
            result.qb_out = true;
            result.out_players.push(format!("🚨 {} (QB)", inj.player_name));
        } else {
            let name = inj.player_name.to_lowercase();
            if stars.iter().any(|star| name.contains(star.as_str())) {
                result.impact += STAR_OUT_IMPACT;
                result.out_players.push(inj.player_name.clone());
            }
        }
    }
    result
}

/// Confidence band for a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalTier {
    TossUp,
    Lean,
    Buy,
    StrongBuy,
}

impl SignalTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            SignalTier::StrongBuy
        } else if score >= 6.5 {
            SignalTier::Buy
        } else if score >= 5.5 {
            SignalTier::Lean
        } else {
            SignalTier::TossUp
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalTier::StrongBuy => "STRONG BUY",
            SignalTier::Buy => "BUY",
            SignalTier::Lean => "LEAN",
            SignalTier::TossUp => "TOSS-UP",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SignalTier::StrongBuy => "#00ff00",
            SignalTier::Buy => "#00aaff",
            SignalTier::Lean => "#ffff00",
            SignalTier::TossUp => "#888888",
        }
    }
}

impl std::fmt::Display for SignalTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored pre-game matchup
#[derive(Debug, Clone, Serialize)]
pub struct EdgePick {
    pub pick: String,
    pub pick_side: Side,
    /// Normalized confidence of the picked side, 0-10
    pub score: f64,
    pub home_score: f64,
    pub away_score: f64,
    /// Up to four reasons for the picked side, in accumulation order
    pub reasons: Vec<String>,
    pub home_out: Vec<String>,
    pub away_out: Vec<String>,
    pub home_impact: f64,
    pub away_impact: f64,
}

impl EdgePick {
    pub fn tier(&self) -> SignalTier {
        SignalTier::from_score(self.score)
    }
}

#[derive(Debug, Default)]
struct SideTally {
    points: f64,
    reasons: Vec<String>,
}

impl SideTally {
    fn award(&mut self, points: f64, reason: Option<String>) {
        self.points += points;
        if let Some(r) = reason {
            self.reasons.push(r);
        }
    }
}

/// Scores scheduled matchups against the team reference data
#[derive(Debug, Clone, Default)]
pub struct EdgeScorer {
    teams: TeamDirectory,
}

impl EdgeScorer {
    pub fn new(teams: TeamDirectory) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &TeamDirectory {
        &self.teams
    }

    pub fn score_matchup(&self, home_team: &str, away_team: &str, injuries: &InjuryReport) -> EdgePick {
        let home = self.teams.stats(home_team);
        let away = self.teams.stats(away_team);
        let mut home_tally = SideTally::default();
        let mut away_tally = SideTally::default();

        // 1. Offensive value edge
        let ov_diff = home.offensive_value - away.offensive_value;
        if ov_diff > OFFENSE_EDGE_THRESHOLD {
            home_tally.award(
                OFFENSE_EDGE_POINTS,
                Some(format!("📊 DVOA {:+.1}", home.offensive_value)),
            );
        } else if ov_diff < -OFFENSE_EDGE_THRESHOLD {
            away_tally.award(
                OFFENSE_EDGE_POINTS,
                Some(format!("📊 DVOA {:+.1}", away.offensive_value)),
            );
        }

        // 2. Top defenses, both sides may qualify
        if home.defense_rank <= TOP_DEFENSE_RANK {
            home_tally.award(TOP_DEFENSE_POINTS, Some(format!("🛡️ #{} DEF", home.defense_rank)));
        }
        if away.defense_rank <= TOP_DEFENSE_RANK {
            away_tally.award(TOP_DEFENSE_POINTS, Some(format!("🛡️ #{} DEF", away.defense_rank)));
        }

        // 3. Home field
        home_tally.award(HOME_FIELD_POINTS, None);

        // 4. Quarterbacks ruled out
        let home_inj = evaluate_injuries(home_team, injuries, &self.teams);
        let away_inj = evaluate_injuries(away_team, injuries, &self.teams);
        if away_inj.qb_out {
            home_tally.award(QB_OUT_POINTS, Some("🏥 QB Out".to_string()));
        }
        if home_inj.qb_out {
            away_tally.award(QB_OUT_POINTS, Some("🏥 QB Out".to_string()));
        }

        // 5. Strong home record
        if home.home_win_rate > STRONG_HOME_RATE {
            home_tally.award(
                STRONG_HOME_POINTS,
                Some(format!("🏠 {:.0}%", home.home_win_rate * 100.0)),
            );
        }

        // 6. Normalize
        let (home_final, away_final) = normalize(home_tally.points, away_tally.points);

        // 7. Pick, ties to home
        let (pick_side, score, mut reasons) = if home_final >= away_final {
            (Side::Home, home_final, home_tally.reasons)
        } else {
            (Side::Away, away_final, away_tally.reasons)
        };
        reasons.truncate(MAX_REASONS);

        let pick = match pick_side {
            Side::Home => home_team,
            Side::Away => away_team,
        };
        debug!(
            "{}@{}: home {:.1} away {:.1} -> {} {:.1}",
            away_team, home_team, home_final, away_final, pick, score
        );

        EdgePick {
            pick: pick.to_string(),
            pick_side,
            score,
            home_score: home_final,
            away_score: away_final,
            reasons,
            home_out: home_inj.out_players,
            away_out: away_inj.out_players,
            home_impact: home_inj.impact,
            away_impact: away_inj.impact,
        }
    }
}

/// Share of points per side scaled to 10, one decimal. 5.0 each when
/// neither side has points.
fn normalize(home_points: f64, away_points: f64) -> (f64, f64) {
    let total = home_points + away_points;
    if total <= 0.0 {
        return (5.0, 5.0);
    }
    (
        round1(home_points / total * 10.0),
        round1(away_points / total * 10.0),
    )
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InjuryRecord, Team, TeamStats};

    static TWINS: [Team; 2] = [
        Team {
            name: "Alpha",
            display_name: "Alpha City Alphas",
            venue_code: "ALP",
            stats: TeamStats {
                offensive_value: 3.0,
                defense_rank: 12,
                home_win_rate: 0.5,
            },
            stars: &["Star One"],
        },
        Team {
            name: "Beta",
            display_name: "Beta Town Betas",
            venue_code: "BET",
            stats: TeamStats {
                offensive_value: 3.0,
                defense_rank: 12,
                home_win_rate: 0.5,
            },
            stars: &["Star Two"],
        },
    ];

    fn report(team: &str, records: Vec<InjuryRecord>) -> InjuryReport {
        let mut r = InjuryReport::new();
        r.insert(team.to_string(), records);
        r
    }

    #[test]
    fn test_identical_teams_pick_home() {
        let scorer = EdgeScorer::new(TeamDirectory::from_teams(&TWINS));
        let pick = scorer.score_matchup("Alpha", "Beta", &InjuryReport::new());
        assert_eq!(pick.pick, "Alpha");
        assert_eq!(pick.pick_side, Side::Home);
        assert_eq!(pick.score, 10.0);
        assert_eq!(pick.away_score, 0.0);
        assert!(pick.reasons.is_empty());
        assert_eq!(pick.tier(), SignalTier::StrongBuy);
    }

    #[test]
    fn test_unknown_teams_use_defaults() {
        let scorer = EdgeScorer::default();
        let pick = scorer.score_matchup("Nowhere", "Elsewhere", &InjuryReport::new());
        assert_eq!(pick.pick, "Nowhere");
        assert_eq!(pick.score, 10.0);
    }

    #[test]
    fn test_away_qb_out_favors_home() {
        let scorer = EdgeScorer::new(TeamDirectory::from_teams(&TWINS));
        let injuries = report("Beta", vec![InjuryRecord::new("Backup Guy", "Out - Hamstring", "QB")]);
        let pick = scorer.score_matchup("Alpha", "Beta", &injuries);
        assert_eq!(pick.pick, "Alpha");
        assert_eq!(pick.reasons, vec!["🏥 QB Out".to_string()]);
        assert_eq!(pick.away_out, vec!["🚨 Backup Guy (QB)".to_string()]);
        assert_eq!(pick.away_impact, 5.0);
    }

    #[test]
    fn test_home_qb_out_flips_pick() {
        let scorer = EdgeScorer::new(TeamDirectory::from_teams(&TWINS));
        let injuries = report("Alpha", vec![InjuryRecord::new("Starter", "OUT", "qb")]);
        let pick = scorer.score_matchup("Alpha", "Beta", &injuries);
        // home 1.0, away 2.5 -> 2.9 / 7.1
        assert_eq!(pick.pick, "Beta");
        assert_eq!(pick.pick_side, Side::Away);
        assert_eq!(pick.score, 7.1);
        assert_eq!(pick.home_score, 2.9);
        assert_eq!(pick.tier(), SignalTier::Buy);
    }

    #[test]
    fn test_real_matchup_reasons() {
        // Kansas City (22.5, #7, .82) hosting NY Giants (-15.5, #30, .35)
        let scorer = EdgeScorer::default();
        let pick = scorer.score_matchup("Kansas City", "NY Giants", &InjuryReport::new());
        assert_eq!(pick.pick, "Kansas City");
        assert_eq!(pick.score, 10.0);
        assert_eq!(
            pick.reasons,
            vec!["📊 DVOA +22.5".to_string(), "🏠 82%".to_string()]
        );
    }

    #[test]
    fn test_both_defenses_qualify() {
        // Baltimore (#2) hosting Seattle (#2): 12.5 vs 14.5 is within the band
        let scorer = EdgeScorer::default();
        let pick = scorer.score_matchup("Baltimore", "Seattle", &InjuryReport::new());
        // home: def 1.0 + field 1.0 + home 0.8 = 2.8, away: def 1.0
        assert_eq!(pick.pick, "Baltimore");
        assert_eq!(pick.home_score, 7.4);
        assert_eq!(pick.away_score, 2.6);
        assert_eq!(pick.reasons, vec!["🛡️ #2 DEF".to_string(), "🏠 72%".to_string()]);
    }

    #[test]
    fn test_star_injury_counts_only_when_out() {
        let dir = TeamDirectory::nfl();
        let injuries = report(
            "Kansas City",
            vec![
                InjuryRecord::new("Travis Kelce", "Out", "TE"),
                InjuryRecord::new("Patrick Mahomes", "Questionable", "QB"),
                InjuryRecord::new("Some Lineman", "Out", "G"),
            ],
        );
        let impact = evaluate_injuries("Kansas City", &injuries, &dir);
        assert_eq!(impact.impact, 2.0);
        assert!(!impact.qb_out);
        assert_eq!(impact.out_players, vec!["Travis Kelce".to_string()]);

        let none = evaluate_injuries("Detroit", &injuries, &dir);
        assert_eq!(none, InjuryImpact::default());
    }

    #[test]
    fn test_score_always_within_bounds() {
        let dir = TeamDirectory::nfl();
        let names: Vec<&str> = ["Kansas City", "NY Giants", "Seattle", "Tennessee", "Nowhere"].to_vec();
        let mut injuries = InjuryReport::new();
        for n in &names {
            injuries.insert(n.to_string(), vec![InjuryRecord::new("QB1", "OUT", "QB")]);
        }
        let scorer = EdgeScorer::new(dir);
        for home in &names {
            for away in &names {
                for inj in [&injuries, &InjuryReport::new()] {
                    let pick = scorer.score_matchup(home, away, inj);
                    assert!((0.0..=10.0).contains(&pick.score), "{away}@{home}");
                    assert!(pick.reasons.len() <= MAX_REASONS);
                }
            }
        }
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(SignalTier::from_score(8.0), SignalTier::StrongBuy);
        assert_eq!(SignalTier::from_score(7.9), SignalTier::Buy);
        assert_eq!(SignalTier::from_score(6.5), SignalTier::Buy);
        assert_eq!(SignalTier::from_score(5.5), SignalTier::Lean);
        assert_eq!(SignalTier::from_score(5.4), SignalTier::TossUp);
        assert_eq!(SignalTier::TossUp.to_string(), "TOSS-UP");
    }

    #[test]
    fn test_normalize_zero_points() {
        assert_eq!(normalize(0.0, 0.0), (5.0, 5.0));
    }
}
