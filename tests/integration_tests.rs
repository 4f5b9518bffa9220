//! Integration tests for the resume ranker

use resume_ranker::config::{SimilarityConfig, SimilarityMetric};
use resume_ranker::error::{Result, ResumeRankerError};
use resume_ranker::input::InputManager;
use resume_ranker::processing::embeddings::EmbeddingProvider;
use resume_ranker::processing::pipeline::RankingPipeline;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Deterministic stand-in for the embedding model: a hashed bag-of-words
/// projection, L2-normalized. Texts sharing tokens get high cosine scores.
struct BagOfWordsEmbedder {
    dim: usize,
}

impl BagOfWordsEmbedder {
    fn new() -> Self {
        Self { dim: 512 }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for token in text.split_whitespace() {
            let bucket = (fnv1a(token) % self.dim as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl EmbeddingProvider for BagOfWordsEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Embedder whose backend always fails.
struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(ResumeRankerError::Embedding("model unavailable".to_string()))
    }

    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(ResumeRankerError::Embedding("model unavailable".to_string()))
    }
}

fn test_pipeline() -> RankingPipeline {
    RankingPipeline::new(Arc::new(BagOfWordsEmbedder::new())).unwrap()
}

#[test]
fn test_single_candidate_end_to_end() {
    let pipeline = test_pipeline();
    let job = "Python Developer. Required Skills: Python, Flask, SQL. Experience: 3+ years";
    let resumes = vec![
        "Experienced Python Developer. Skills: Python, Flask, SQL, Django. Experience: 5 years."
            .to_string(),
    ];

    let response = pipeline
        .rank_resumes(job, &resumes, &SimilarityConfig::default())
        .unwrap();

    assert_eq!(response.matches.len(), 1);
    let top = &response.matches[0];
    assert_eq!(top.rank, 1);
    assert_eq!(top.id, "resume_0");
    assert!(
        top.similarity_score > 0.6,
        "expected a high-similarity score, got {}",
        top.similarity_score
    );

    let skills = &top.skill_match;
    assert!(skills.matching.contains("python"));
    assert!(skills.matching.contains("flask"));
    assert!(skills.matching.contains("sql"));
    assert!(skills.extra.contains("django"));
    assert!(skills.missing.is_empty());
    assert_eq!(skills.match_ratio, 1.0);

    assert!(!top.explanation.explanation.is_empty());
    assert_eq!(response.ranking_summary.total_matches, 1);
}

#[test]
fn test_ranks_form_contiguous_permutation() {
    let pipeline = test_pipeline();
    let job = "Rust systems engineer building async services with Tokio";
    let resumes = vec![
        "Java backend developer working on Spring services".to_string(),
        "Rust systems engineer experienced with async services and Tokio".to_string(),
        "Rust engineer".to_string(),
    ];

    let response = pipeline
        .rank_resumes(job, &resumes, &SimilarityConfig::default())
        .unwrap();

    let mut ranks: Vec<usize> = response.matches.iter().map(|m| m.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3]);

    // The near-verbatim resume wins.
    assert_eq!(response.matches[0].id, "resume_1");

    for pair in response.matches.windows(2) {
        assert!(pair[0].similarity_score >= pair[1].similarity_score);
    }
}

#[test]
fn test_exact_ties_preserve_submission_order() {
    let pipeline = test_pipeline();
    let job = "Python developer";
    let resumes = vec![
        "Senior Python developer".to_string(),
        "Senior Python developer".to_string(),
    ];

    let response = pipeline
        .rank_resumes(job, &resumes, &SimilarityConfig::default())
        .unwrap();

    assert_eq!(response.matches[0].id, "resume_0");
    assert_eq!(response.matches[0].rank, 1);
    assert_eq!(response.matches[1].id, "resume_1");
    assert_eq!(response.matches[1].rank, 2);
}

#[test]
fn test_scores_stay_in_unit_interval() {
    let pipeline = test_pipeline();
    let job = "Data engineer with Spark and Kafka";
    let resumes = vec![
        "Completely unrelated pastry chef".to_string(),
        "Data engineer who knows Spark".to_string(),
    ];

    let response = pipeline
        .rank_resumes(job, &resumes, &SimilarityConfig::default())
        .unwrap();

    for m in &response.matches {
        assert!((0.0..=1.0).contains(&m.cosine_similarity));
        assert!((0.0..=1.0).contains(&m.euclidean_similarity));
        assert!((0.0..=1.0).contains(&m.similarity_score));
        assert!((0.0..=1.0).contains(&m.skill_match.match_ratio));
    }
}

#[test]
fn test_top_k_limits_matches_but_not_summary() {
    let pipeline = test_pipeline();
    let job = "Python developer";
    let resumes = vec![
        "Python developer".to_string(),
        "Python engineer".to_string(),
        "Gardener".to_string(),
    ];
    let config = SimilarityConfig {
        top_k: 1,
        ..SimilarityConfig::default()
    };

    let response = pipeline.rank_resumes(job, &resumes, &config).unwrap();

    assert_eq!(response.matches.len(), 1);
    assert_eq!(response.matches[0].rank, 1);
    // The summary is computed over all scored candidates.
    assert_eq!(response.ranking_summary.total_matches, 3);
    assert_eq!(response.resumes.count, 3);
    assert_eq!(response.resumes.statistics.len(), 3);
}

#[test]
fn test_threshold_filters_weak_matches() {
    let pipeline = test_pipeline();
    let job = "Kubernetes platform engineer";
    let resumes = vec![
        "Kubernetes platform engineer".to_string(),
        "Watercolor painter".to_string(),
    ];
    let config = SimilarityConfig {
        threshold: 0.9,
        ..SimilarityConfig::default()
    };

    let response = pipeline.rank_resumes(job, &resumes, &config).unwrap();

    assert!(response.matches.iter().all(|m| m.similarity_score >= 0.9));
    assert_eq!(response.ranking_summary.total_matches, 2);
}

#[test]
fn test_unrecognized_metric_falls_back_to_cosine() {
    let pipeline = test_pipeline();
    let config = SimilarityConfig {
        metric: SimilarityMetric::parse("manhattan"),
        ..SimilarityConfig::default()
    };

    let response = pipeline
        .rank_resumes("Python developer", &["Python developer".to_string()], &config)
        .unwrap();

    assert_eq!(response.metric, SimilarityMetric::Cosine);
}

#[test]
fn test_zero_candidates_is_a_distinct_error() {
    let pipeline = test_pipeline();
    let result = pipeline.rank_resumes("Python developer", &[], &SimilarityConfig::default());

    assert!(matches!(result, Err(ResumeRankerError::NoCandidates)));
}

#[test]
fn test_embedding_failure_maps_to_no_scorable_candidates() {
    let pipeline = RankingPipeline::new(Arc::new(FailingEmbedder)).unwrap();
    let result = pipeline.rank_resumes(
        "Python developer",
        &["Python developer".to_string()],
        &SimilarityConfig::default(),
    );

    assert!(matches!(result, Err(ResumeRankerError::NoScorableCandidates)));
}

#[test]
fn test_reference_statistics_and_skills_are_reported() {
    let pipeline = test_pipeline();
    let job = "Python Developer. Required Skills: Python, Flask, SQL.";
    let resumes = vec!["Python developer".to_string()];

    let response = pipeline
        .rank_resumes(job, &resumes, &SimilarityConfig::default())
        .unwrap();

    assert!(response.job_description.statistics.word_count > 0);
    assert!(response.job_description.skills.contains("python"));
    assert!(response.job_description.skills.contains("flask"));
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("Flask"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Flask"));
    // Markdown formatting must not survive extraction.
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_extraction_caching() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let first = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.extract_text(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.xyz");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "some text").unwrap();

    let mut manager = InputManager::new();
    let result = manager.extract_text(&path).await;
    assert!(matches!(result, Err(ResumeRankerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file_is_rejected() {
    let mut manager = InputManager::new();
    let result = manager
        .extract_text(Path::new("tests/fixtures/nonexistent.txt"))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_ranking_from_extracted_files() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();
    let resume = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let pipeline = test_pipeline();
    let response = pipeline
        .rank_resumes(&job, &[resume], &SimilarityConfig::default())
        .unwrap();

    assert_eq!(response.matches.len(), 1);
    let skills = &response.matches[0].skill_match;
    assert!(skills.matching.contains("python"));
    assert!(skills.matching.contains("flask"));
    assert!(skills.matching.contains("sql"));
    assert!(skills.missing.contains("docker"));
}
