use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub poll: PollConfig,
    pub trackers: TrackerConfig,
    pub positions: PositionsConfig,
    pub venue: VenueConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Scoreboard endpoint (live + scheduled games)
    pub scoreboard_url: String,
    /// Injury report endpoint
    pub injuries_url: String,
    /// HTTP timeout in seconds for each fetch
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Seconds between polling cycles in watch mode
    pub interval_secs: u64,
    /// Picks scoring below this are hidden from the ranked list
    pub min_pick_score: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Maximum number of game keys held by the tracker cache
    pub capacity: usize,
    /// Seconds a finished game keeps its trackers before eviction
    pub final_grace_secs: u64,
    /// Samples kept per game for momentum
    pub momentum_window: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            final_grace_secs: 1800,
            momentum_window: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionsConfig {
    /// JSON file holding tracked positions
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueConfig {
    /// Base URL of the trading venue
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

pub const DEFAULT_SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl/scoreboard";
pub const DEFAULT_INJURIES_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl/injuries";
pub const DEFAULT_VENUE_URL: &str = "https://kalshi.com";

/// Default location of the positions file: `<data dir>/nfl-edge/positions.json`
pub fn default_positions_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nfl-edge")
        .join("positions.json")
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let positions_path = default_positions_path().to_string_lossy().into_owned();

        let builder = Config::builder()
            // Start with default values
            .set_default("feed.scoreboard_url", DEFAULT_SCOREBOARD_URL)?
            .set_default("feed.injuries_url", DEFAULT_INJURIES_URL)?
            .set_default("feed.timeout_secs", 10)?
            .set_default("poll.interval_secs", 15)?
            .set_default("poll.min_pick_score", 5.5)?
            .set_default("trackers.capacity", 256)?
            .set_default("trackers.final_grace_secs", 1800)?
            .set_default("trackers.momentum_window", 10)?
            .set_default("positions.path", positions_path)?
            .set_default("venue.base_url", DEFAULT_VENUE_URL)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("NFL_EDGE_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (NFL_EDGE__POLL__INTERVAL_SECS, etc.)
            .add_source(
                Environment::with_prefix("NFL_EDGE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Built-in configuration, used when no config directory is present
    pub fn default_config() -> Self {
        Self {
            feed: FeedConfig {
                scoreboard_url: DEFAULT_SCOREBOARD_URL.to_string(),
                injuries_url: DEFAULT_INJURIES_URL.to_string(),
                timeout_secs: 10,
            },
            poll: PollConfig {
                interval_secs: 15,
                min_pick_score: 5.5,
            },
            trackers: TrackerConfig::default(),
            positions: PositionsConfig {
                path: default_positions_path(),
            },
            venue: VenueConfig {
                base_url: DEFAULT_VENUE_URL.to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.feed.timeout_secs == 0 {
            errors.push("feed.timeout_secs must be positive".to_string());
        }

        if self.poll.interval_secs == 0 {
            errors.push("poll.interval_secs must be positive".to_string());
        }

        if !(0.0..=10.0).contains(&self.poll.min_pick_score) {
            errors.push(format!(
                "poll.min_pick_score must be within 0-10, got {}",
                self.poll.min_pick_score
            ));
        }

        if self.trackers.capacity == 0 {
            errors.push("trackers.capacity must be positive".to_string());
        }

        if self.trackers.momentum_window < 3 {
            errors.push("trackers.momentum_window must hold at least 3 samples".to_string());
        }

        if url::Url::parse(&self.venue.base_url).is_err() {
            errors.push(format!("venue.base_url is not a URL: {}", self.venue.base_url));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
