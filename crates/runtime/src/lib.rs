pub mod events;
pub mod handle;
pub mod live;
pub mod logging;
pub mod metrics;
pub mod ticker;

pub use handle::{FeedCounts, FeedMode, MarketHandle, SubmitError};
pub use ticker::{MarketRuntime, RuntimeOptions};
