pub mod analyzer;
pub mod fence;
pub mod metrics;
pub mod prompt;
pub mod providers;

pub use analyzer::SentimentAnalyzer;
pub use metrics::{get_metrics, init_metrics};
