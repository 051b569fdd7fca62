pub mod analysis;
pub mod classifier;
pub mod config;
pub mod context;
pub mod fetcher;
pub mod relevance;
pub mod service;
pub mod state;
pub mod store;
pub mod types;
pub mod updater;

pub use analysis::{ClaimAnalyzer, MockAnalyzer};
pub use config::{FeedSpec, UpdaterConfig};
pub use context::ContextAggregator;
pub use fetcher::{FetchConfig, NewsApiSource, NewsSource, RssFeedSource};
pub use service::ClaimService;
pub use state::{CursorStore, SnapshotStore};
pub use store::ClaimStore;
pub use types::*;
pub use updater::AutoUpdater;
