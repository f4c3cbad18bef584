pub mod espn;
pub mod kalshi;
pub mod position_store;

pub use espn::{parse_injuries, parse_scoreboard, EspnClient, ScoreFeed};
pub use kalshi::{build_trade_url, TradeUrlBuilder};
pub use position_store::{JsonPositionStore, PositionBook, PositionStore};
