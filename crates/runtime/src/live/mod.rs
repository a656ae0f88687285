pub mod feed_parse;
pub mod types;

pub use feed_parse::{parse_feed_payload, FeedBatch, ParseFeedError};
pub use types::{FeedIndicators, FeedLevels, FeedMessage, FeedTradeSignal};
