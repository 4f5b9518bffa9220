//! Configuration management for the resume ranker

use crate::error::{Result, ResumeRankerError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Similarity metric requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    Cosine,
    Euclidean,
    Combined,
}

impl SimilarityMetric {
    /// Parse a metric name. Unrecognized names fall back to cosine; this
    /// leniency is intentional and must not fail the request.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "cosine" => SimilarityMetric::Cosine,
            "euclidean" => SimilarityMetric::Euclidean,
            "combined" => SimilarityMetric::Combined,
            other => {
                debug!("Unrecognized similarity metric '{}', using cosine", other);
                SimilarityMetric::Cosine
            }
        }
    }
}

impl std::fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimilarityMetric::Cosine => write!(f, "cosine"),
            SimilarityMetric::Euclidean => write!(f, "euclidean"),
            SimilarityMetric::Combined => write!(f, "combined"),
        }
    }
}

/// Per-request matching parameters. Supplied once per request, immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    pub metric: SimilarityMetric,
    pub threshold: f32,
    pub top_k: usize,
    pub weights: Option<HashMap<String, f32>>,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            metric: SimilarityMetric::Cosine,
            threshold: 0.0,
            top_k: 5,
            weights: None,
        }
    }
}

/// Process-wide configuration persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub matching: MatchingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub default_metric: SimilarityMetric,
    pub default_top_k: usize,
    pub default_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub color_output: bool,
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-ranker")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "minishlab/M2V_base_output".to_string(),
            },
            matching: MatchingConfig {
                default_metric: SimilarityMetric::Cosine,
                default_top_k: 5,
                default_threshold: 0.0,
            },
            output: OutputConfig {
                color_output: true,
                pretty_json: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                ResumeRankerError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    /// Request config seeded from file defaults.
    pub fn similarity_defaults(&self) -> SimilarityConfig {
        SimilarityConfig {
            metric: self.matching.default_metric,
            threshold: self.matching.default_threshold,
            top_k: self.matching.default_top_k,
            weights: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parsing() {
        assert_eq!(SimilarityMetric::parse("cosine"), SimilarityMetric::Cosine);
        assert_eq!(SimilarityMetric::parse("EUCLIDEAN"), SimilarityMetric::Euclidean);
        assert_eq!(SimilarityMetric::parse(" combined "), SimilarityMetric::Combined);
    }

    #[test]
    fn test_unrecognized_metric_falls_back_to_cosine() {
        assert_eq!(SimilarityMetric::parse("manhattan"), SimilarityMetric::Cosine);
        assert_eq!(SimilarityMetric::parse(""), SimilarityMetric::Cosine);
    }

    #[test]
    fn test_similarity_config_defaults() {
        let config = SimilarityConfig::default();
        assert_eq!(config.metric, SimilarityMetric::Cosine);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.threshold, 0.0);
        assert!(config.weights.is_none());
    }
}
