pub mod board;
pub mod demo_feed;
pub mod leagues;
pub mod logging;
pub mod odds;
pub mod odds_fetch;
pub mod persist;
pub mod prediction;
pub mod refresh;
pub mod report;
pub mod value_bets;
