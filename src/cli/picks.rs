//! `nfl-edge picks` - ranked pre-game picks.

use chrono::Utc;
use serde::Serialize;
use tabled::Tabled;

use super::live::report_feed_status;
use super::output::{self, OutputMode};
use crate::adapters::EspnClient;
use crate::config::AppConfig;
use crate::domain::TeamDirectory;
use crate::strategy::{Dashboard, RankedPick};

#[derive(Debug, Serialize, Tabled)]
pub struct PickRow {
    pub matchup: String,
    pub pick: String,
    pub score: String,
    pub tier: String,
    pub why: String,
    pub injuries: String,
    pub url: String,
}

impl PickRow {
    pub fn build(ranked: &RankedPick) -> Self {
        let edge = &ranked.edge;
        let out: Vec<&str> = edge
            .away_out
            .iter()
            .chain(edge.home_out.iter())
            .map(String::as_str)
            .collect();
        Self {
            matchup: ranked.game.game_key.clone(),
            pick: edge.pick.clone(),
            score: format!("{:.1}", edge.score),
            tier: ranked.tier.to_string(),
            why: edge.reasons.join(", "),
            injuries: if out.is_empty() {
                "—".to_string()
            } else {
                out.join(", ")
            },
            url: ranked.trade_url.clone(),
        }
    }
}

pub async fn run(
    cfg: &AppConfig,
    all: bool,
    min_score: Option<f64>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let teams = TeamDirectory::nfl();
    let feed = EspnClient::new(&cfg.feed, teams.clone())?;
    let mut dashboard = Dashboard::new(cfg, teams);
    let report = dashboard.poll(&feed, Utc::now()).await;

    let threshold = if all {
        f64::MIN
    } else {
        min_score.unwrap_or(cfg.poll.min_pick_score)
    };
    let picks = report.ranked_picks(threshold);

    if mode == OutputMode::Json {
        return output::print_json(&picks);
    }
    report_feed_status(&report);
    let rows: Vec<PickRow> = picks.into_iter().map(PickRow::build).collect();
    output::print_items(&rows, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameState, InjuryRecord, InjuryReport};
    use crate::strategy::EdgeScorer;

    #[test]
    fn test_pick_row_lists_injuries() {
        let mut injuries = InjuryReport::new();
        injuries.insert(
            "NY Giants".to_string(),
            vec![InjuryRecord::new("Daniel Jones", "Out", "QB")],
        );
        let game = GameState::new("NY Giants", "Kansas City", Utc::now());
        let edge = EdgeScorer::default().score_matchup("Kansas City", "NY Giants", &injuries);
        let ranked = RankedPick {
            tier: edge.tier(),
            trade_url: "https://kalshi.com/markets/KXNFLGAME/X".into(),
            game,
            edge,
        };
        let row = PickRow::build(&ranked);

        assert_eq!(row.pick, "Kansas City");
        assert_eq!(row.score, "10.0");
        assert_eq!(row.tier, "STRONG BUY");
        assert_eq!(row.why, "📊 DVOA +22.5, 🏥 QB Out, 🏠 82%");
        assert_eq!(row.injuries, "🚨 Daniel Jones (QB)");
    }
}
