//! Resume ranker: semantic resume ranking against job descriptions

mod cli;
mod config;
mod error;
mod input;
mod output;
mod processing;

use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, SimilarityConfig, SimilarityMetric};
use error::{Result, ResumeRankerError};
use input::InputManager;
use log::{error, info, warn};
use output::ReportFormat;
use processing::embeddings::Model2VecEmbedder;
use processing::pipeline::RankingPipeline;
use processing::preprocessor::Preprocessor;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Rank {
            job,
            resumes,
            metric,
            top_k,
            threshold,
            model,
            format,
        } => {
            rank_command(&config, &job, &resumes, metric, top_k, threshold, model, &format).await
        }
        Commands::Stats { file } => stats_command(&file).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn rank_command(
    config: &Config,
    job: &Path,
    resumes: &[PathBuf],
    metric: Option<String>,
    top_k: Option<usize>,
    threshold: Option<f32>,
    model: Option<String>,
    format: &str,
) -> Result<()> {
    cli::validate_file_extension(job, &SUPPORTED_EXTENSIONS)
        .map_err(|e| ResumeRankerError::InvalidInput(format!("Job description: {}", e)))?;
    for resume in resumes {
        cli::validate_file_extension(resume, &SUPPORTED_EXTENSIONS)
            .map_err(|e| ResumeRankerError::InvalidInput(format!("Resume: {}", e)))?;
    }

    let mut similarity_config = build_similarity_config(config, metric, top_k, threshold);
    similarity_config.threshold = similarity_config.threshold.clamp(0.0, 1.0);

    let mut input_manager = InputManager::new();

    // A job description that cannot be parsed aborts the whole run.
    let job_text = input_manager.extract_text(job).await?;

    // A resume that cannot be parsed is excluded; the run continues as long
    // as at least one resume parses.
    let mut resume_texts = Vec::new();
    for path in resumes {
        match input_manager.extract_text(path).await {
            Ok(text) => resume_texts.push(text),
            Err(e) => warn!("Skipping resume '{}': {}", path.display(), e),
        }
    }
    if resume_texts.is_empty() {
        return Err(ResumeRankerError::UnparsableDocument(
            "None of the resume files could be parsed".to_string(),
        ));
    }

    let embedder = build_embedder(config, model)?;
    let pipeline = RankingPipeline::new(Arc::new(embedder))?;

    info!(
        "Scoring {} resumes with metric '{}'",
        resume_texts.len(),
        similarity_config.metric
    );
    let response = pipeline.rank_resumes(&job_text, &resume_texts, &similarity_config)?;

    let report_format = ReportFormat::parse(format);
    if report_format == ReportFormat::Console && !config.output.color_output {
        colored::control::set_override(false);
    }

    println!("{}", output::render(&response, report_format)?);
    Ok(())
}

fn build_similarity_config(
    config: &Config,
    metric: Option<String>,
    top_k: Option<usize>,
    threshold: Option<f32>,
) -> SimilarityConfig {
    let mut similarity_config = config.similarity_defaults();
    if let Some(name) = metric {
        similarity_config.metric = SimilarityMetric::parse(&name);
    }
    if let Some(k) = top_k {
        similarity_config.top_k = k;
    }
    if let Some(t) = threshold {
        similarity_config.threshold = t;
    }
    similarity_config
}

fn build_embedder(config: &Config, model: Option<String>) -> Result<Model2VecEmbedder> {
    match model {
        Some(name) => Model2VecEmbedder::new(Path::new(&name), &name),
        None => Model2VecEmbedder::from_config(config),
    }
}

async fn stats_command(file: &Path) -> Result<()> {
    cli::validate_file_extension(file, &SUPPORTED_EXTENSIONS)
        .map_err(ResumeRankerError::InvalidInput)?;

    let mut input_manager = InputManager::new();
    let text = input_manager.extract_text(file).await?;

    let preprocessor = Preprocessor::new();
    let stats = preprocessor.text_statistics(&text);
    let keywords = preprocessor.extract_keywords(&text, 10);

    println!("Statistics for {}", file.display());
    println!("  words:           {}", stats.word_count);
    println!("  unique words:    {}", stats.unique_words);
    println!("  avg word length: {:.2}", stats.avg_word_length);
    println!("  keyword density: {:.2}%", stats.keyword_density);
    if !keywords.is_empty() {
        println!("  top keywords:    {}", keywords.join(", "));
    }

    Ok(())
}
