//! Resume ranker library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::{Config, SimilarityConfig, SimilarityMetric};
pub use error::{Result, ResumeRankerError};
pub use processing::pipeline::{RankingPipeline, RankingResponse};
