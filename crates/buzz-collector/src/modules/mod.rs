//! 수집 파이프라인 모듈.

pub mod alert;
pub mod cycle;
pub mod directory;
pub mod ingest;
pub mod keyword;
pub mod mention;
pub mod snapshot;

pub use alert::{AlertRecorder, AlertRules, ALERT_HISTORY_FILE};
pub use cycle::{Collector, CycleContext};
pub use directory::{build_directory, filter_listing, DirectoryStats};
pub use ingest::{fetch_channel, scan_channel, screen_message, ChannelScan, PreparedMessage, Screening};
pub use keyword::extract_theme;
pub use mention::{match_tickers, record_mentions};
pub use snapshot::{rank_mentions, SnapshotWriter, MARKET_DATA_FILE, SEARCH_DB_FILE};
