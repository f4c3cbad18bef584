//! NFL team reference data
//!
//! Static per-team facts used by the scorer and the venue URL builder:
//! venue ticker code, full display name, efficiency stats and the
//! notable-player roster checked against injury reports.

use serde::Serialize;
use std::collections::HashMap;

/// Season efficiency stats for one team
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamStats {
    /// Signed offensive value metric (DVOA-style), roughly -20..+25
    pub offensive_value: f64,
    /// Defensive rank, 1 = best, 32 = worst
    pub defense_rank: u8,
    /// Historical home win rate, 0..1
    pub home_win_rate: f64,
}

impl Default for TeamStats {
    /// Neutral stats for teams missing from the directory
    fn default() -> Self {
        Self {
            offensive_value: 0.0,
            defense_rank: 16,
            home_win_rate: 0.5,
        }
    }
}

/// One team's reference entry
#[derive(Debug, Clone, Serialize)]
pub struct Team {
    /// Canonical short name, e.g. "Kansas City"
    pub name: &'static str,
    /// Full feed display name, e.g. "Kansas City Chiefs"
    pub display_name: &'static str,
    /// Venue ticker code, e.g. "KC"
    pub venue_code: &'static str,
    pub stats: TeamStats,
    pub stars: &'static [&'static str],
}

/// Venue code used when a team cannot be resolved
pub const UNKNOWN_VENUE_CODE: &str = "XXX";

const fn team(
    name: &'static str,
    display_name: &'static str,
    venue_code: &'static str,
    offensive_value: f64,
    defense_rank: u8,
    home_win_rate: f64,
    stars: &'static [&'static str],
) -> Team {
    Team {
        name,
        display_name,
        venue_code,
        stats: TeamStats {
            offensive_value,
            defense_rank,
            home_win_rate,
        },
        stars,
    }
}

static NFL_TEAMS: [Team; 32] = [
    team("Arizona", "Arizona Cardinals", "ARI", -8.5, 28, 0.45, &["Kyler Murray"]),
    team("Atlanta", "Atlanta Falcons", "ATL", 2.5, 20, 0.55, &["Kirk Cousins", "Bijan Robinson"]),
    team("Baltimore", "Baltimore Ravens", "BAL", 12.5, 2, 0.72, &["Lamar Jackson", "Derrick Henry"]),
    team("Buffalo", "Buffalo Bills", "BUF", 15.8, 4, 0.78, &["Josh Allen", "James Cook"]),
    team("Carolina", "Carolina Panthers", "CAR", -12.5, 26, 0.38, &["Bryce Young"]),
    team("Chicago", "Chicago Bears", "CHI", 8.5, 10, 0.65, &["Caleb Williams"]),
    team("Cincinnati", "Cincinnati Bengals", "CIN", 5.8, 12, 0.58, &["Joe Burrow", "Ja'Marr Chase"]),
    team("Cleveland", "Cleveland Browns", "CLE", -2.5, 15, 0.52, &["Deshaun Watson"]),
    team("Dallas", "Dallas Cowboys", "DAL", 3.2, 14, 0.62, &["Dak Prescott", "CeeDee Lamb"]),
    team("Denver", "Denver Broncos", "DEN", 12.5, 3, 0.75, &["Bo Nix"]),
    team("Detroit", "Detroit Lions", "DET", 18.5, 6, 0.75, &["Jared Goff", "Amon-Ra St. Brown"]),
    team("Green Bay", "Green Bay Packers", "GB", 8.2, 10, 0.70, &["Jordan Love"]),
    team("Houston", "Houston Texans", "HOU", 6.5, 8, 0.58, &["C.J. Stroud", "Nico Collins"]),
    team("Indianapolis", "Indianapolis Colts", "IND", -6.8, 22, 0.48, &["Anthony Richardson"]),
    team("Jacksonville", "Jacksonville Jaguars", "JAX", -4.5, 19, 0.45, &["Trevor Lawrence"]),
    team("Kansas City", "Kansas City Chiefs", "KC", 22.5, 7, 0.82, &["Patrick Mahomes", "Travis Kelce"]),
    team("Las Vegas", "Las Vegas Raiders", "LV", -8.2, 25, 0.45, &["Gardner Minshew"]),
    team("LA Chargers", "Los Angeles Chargers", "LAC", 7.8, 9, 0.55, &["Justin Herbert"]),
    team("LA Rams", "Los Angeles Rams", "LA", 5.5, 14, 0.55, &["Matthew Stafford", "Puka Nacua"]),
    team("Miami", "Miami Dolphins", "MIA", 5.2, 13, 0.62, &["Tua Tagovailoa", "Tyreek Hill"]),
    team("Minnesota", "Minnesota Vikings", "MIN", 10.5, 11, 0.68, &["J.J. McCarthy", "Justin Jefferson"]),
    team("New England", "New England Patriots", "NE", 9.5, 5, 0.70, &["Drake Maye"]),
    team("New Orleans", "New Orleans Saints", "NO", -3.8, 21, 0.55, &["Derek Carr"]),
    team("NY Giants", "New York Giants", "NYG", -15.5, 30, 0.35, &["Daniel Jones"]),
    team("NY Jets", "New York Jets", "NYJ", -7.5, 23, 0.42, &["Aaron Rodgers"]),
    team("Philadelphia", "Philadelphia Eagles", "PHI", 14.8, 3, 0.75, &["Jalen Hurts", "Saquon Barkley"]),
    team("Pittsburgh", "Pittsburgh Steelers", "PIT", 2.8, 5, 0.65, &["Russell Wilson"]),
    team("San Francisco", "San Francisco 49ers", "SF", 10.5, 6, 0.68, &["Brock Purdy", "Christian McCaffrey"]),
    team("Seattle", "Seattle Seahawks", "SEA", 14.5, 2, 0.78, &["Sam Darnold", "Jaxon Smith-Njigba"]),
    team("Tampa Bay", "Tampa Bay Buccaneers", "TB", 4.2, 29, 0.55, &["Baker Mayfield"]),
    team("Tennessee", "Tennessee Titans", "TEN", -9.8, 31, 0.42, &["Will Levis"]),
    team("Washington", "Washington Commanders", "WAS", 9.5, 8, 0.62, &["Jayden Daniels"]),
];

/// Lookup table over the team reference data
#[derive(Debug, Clone)]
pub struct TeamDirectory {
    by_name: HashMap<&'static str, &'static Team>,
    by_display: HashMap<&'static str, &'static str>,
}

impl TeamDirectory {
    /// The 32 NFL teams
    pub fn nfl() -> Self {
        Self::from_teams(&NFL_TEAMS)
    }

    pub fn from_teams(teams: &'static [Team]) -> Self {
        let mut by_name = HashMap::with_capacity(teams.len());
        let mut by_display = HashMap::with_capacity(teams.len());
        for t in teams {
            by_name.insert(t.name, t);
            by_display.insert(t.display_name, t.name);
        }
        Self {
            by_name,
            by_display,
        }
    }

    pub fn get(&self, name: &str) -> Option<&'static Team> {
        self.by_name.get(name).copied()
    }

    /// Map a feed display name ("Kansas City Chiefs") to the canonical
    /// short name. Unknown names pass through unchanged.
    pub fn canonical_name(&self, display_name: &str) -> String {
        self.by_display
            .get(display_name)
            .map(|n| n.to_string())
            .unwrap_or_else(|| display_name.to_string())
    }

    /// Stats for a team, neutral defaults on a miss
    pub fn stats(&self, name: &str) -> TeamStats {
        self.get(name).map(|t| t.stats).unwrap_or_default()
    }

    pub fn stars(&self, name: &str) -> &'static [&'static str] {
        self.get(name).map(|t| t.stars).unwrap_or(&[])
    }

    /// Venue ticker code, `XXX` when unknown
    pub fn venue_code(&self, name: &str) -> &'static str {
        self.get(name)
            .map(|t| t.venue_code)
            .unwrap_or(UNKNOWN_VENUE_CODE)
    }

    /// Short label for display: the venue code, or the first three
    /// letters of the name uppercased when the team is unknown.
    pub fn display_code(&self, name: &str) -> String {
        match self.get(name) {
            Some(t) => t.venue_code.to_string(),
            None => name.chars().take(3).collect::<String>().to_uppercase(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for TeamDirectory {
    fn default() -> Self {
        Self::nfl()
    }
}
