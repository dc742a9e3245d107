pub mod analysis;

pub use analysis::{
    AnalysisRequest, AnalysisResult, Emotion, MorphemeEntry, OutputCheck, Sentiment,
    SentimentScores, MAX_TEXT_CHARS,
};
