// Public modules
pub mod config;
pub mod discovery;
pub mod errors;
pub mod filter;
pub mod models;
pub mod pacing;
pub mod report;
pub mod rss;
pub mod scorer;
pub mod trends;

// Re-export commonly used types
pub use config::{Config, TopicMap};
pub use discovery::{discover_candidates, DiscoveryStrategy, RssFeedStrategy, TrendingNowStrategy};
pub use errors::TrendError;
pub use filter::{FilterRules, NoiseFilter};
pub use models::{CandidateTerm, DailyReport, ScoredTrend, SeriesMap};
pub use pacing::CallPacer;
pub use report::{category_breakdown, list_reports, load_report, write_report, CategorySummary};
pub use scorer::{BuildabilitySignal, KeywordBuildability, ScoreWeights, Scorer};
pub use trends::TrendsClient;
