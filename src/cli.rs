//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "resume-ranker",
    about = "Rank resumes against a job description by semantic similarity and skill overlap",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resume files against a job description
    Rank {
        /// Job description file (pdf, txt, md)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files to rank
        #[arg(short, long, num_args = 1.., required = true)]
        resumes: Vec<PathBuf>,

        /// Similarity metric: cosine, euclidean or combined
        #[arg(short, long)]
        metric: Option<String>,

        /// Maximum number of matches to return
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum combined score for a returned match
        #[arg(long)]
        threshold: Option<f32>,

        /// Embedding model directory or HuggingFace repo id
        #[arg(long)]
        model: Option<String>,

        /// Output format: console or json
        #[arg(short, long, default_value = "console")]
        format: String,
    },

    /// Show text statistics and top keywords for a document
    Stats {
        /// Document file (pdf, txt, md)
        file: PathBuf,
    },
}

/// Check a path against an allowed set of extensions.
pub fn validate_file_extension(path: &Path, allowed: &[&str]) -> Result<(), String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| format!("'{}' has no file extension", path.display()))?;

    if allowed.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(format!(
            "'{}' has unsupported extension '{}' (expected one of: {})",
            path.display(),
            extension,
            allowed.join(", ")
        ))
    }
}
