//! Pipeline orchestration: normalize, preprocess, embed, score, rank, explain

use crate::config::{SimilarityConfig, SimilarityMetric};
use crate::error::{Result, ResumeRankerError};
use crate::processing::embeddings::EmbeddingProvider;
use crate::processing::normalizer::TextNormalizer;
use crate::processing::preprocessor::{Preprocessor, TextStatistics};
use crate::processing::ranker::{self, RankingSummary};
use crate::processing::scorer::{self, SimilarityExplanation};
use crate::processing::skills::{EntityRecognizer, SkillMatch, SkillMatcher};
use log::{error, info};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// One document flowing through the pipeline. Request-scoped: created per
/// call, immutable once preprocessed, dropped with the response.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub raw_text: String,
    pub normalized_text: String,
    pub preprocessed_text: String,
    pub embedding: Vec<f32>,
}

/// One ranked candidate in the response.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch {
    pub id: String,
    pub rank: usize,
    pub similarity_score: f32,
    pub cosine_similarity: f32,
    pub euclidean_similarity: f32,
    pub explanation: SimilarityExplanation,
    pub skill_match: SkillMatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
    pub statistics: TextStatistics,
    pub skills: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub count: usize,
    pub statistics: Vec<TextStatistics>,
}

/// Full per-request result: echoed configuration, aggregate summary, ranked
/// matches with explanations and skill data, per-document statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RankingResponse {
    pub metric: SimilarityMetric,
    pub top_k: usize,
    pub threshold: f32,
    pub ranking_summary: RankingSummary,
    pub job_description: ReferenceReport,
    pub matches: Vec<RankedMatch>,
    pub resumes: CandidateReport,
}

pub struct RankingPipeline {
    normalizer: TextNormalizer,
    preprocessor: Preprocessor,
    skill_matcher: SkillMatcher,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl RankingPipeline {
    /// Pipeline with dictionary-only skill extraction.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new(),
            preprocessor: Preprocessor::new(),
            skill_matcher: SkillMatcher::with_dictionary_only()?,
            embedder,
        })
    }

    /// Pipeline with an entity recognizer merged into skill extraction.
    pub fn with_recognizer(
        embedder: Arc<dyn EmbeddingProvider>,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new(),
            preprocessor: Preprocessor::new(),
            skill_matcher: SkillMatcher::new(recognizer)?,
            embedder,
        })
    }

    /// Rank every resume against the job description.
    ///
    /// The job description is encoded in a single call and all resumes in one
    /// batch call, so the embedding collaborator is hit exactly twice per
    /// request regardless of candidate count.
    pub fn rank_resumes(
        &self,
        job_text: &str,
        resume_texts: &[String],
        config: &SimilarityConfig,
    ) -> Result<RankingResponse> {
        if resume_texts.is_empty() {
            return Err(ResumeRankerError::NoCandidates);
        }

        info!("Ranking {} resumes against job description", resume_texts.len());

        let job = self.prepare_reference(job_text)?;
        let resumes = self.prepare_candidates(resume_texts)?;

        let candidate_embeddings: Vec<Vec<f32>> =
            resumes.iter().map(|doc| doc.embedding.clone()).collect();
        let scores = scorer::score_candidates(&job.embedding, &candidate_embeddings);
        if scores.is_empty() {
            return Err(ResumeRankerError::NoScorableCandidates);
        }

        let ranked = ranker::rank_candidates(&scores);
        let ranking_summary = ranker::ranking_summary(&ranked);
        let returned = ranker::apply_limits(ranked, config);

        let matches: Vec<RankedMatch> = returned
            .into_iter()
            .map(|m| {
                let explanation = scorer::explain(
                    m.cosine_similarity,
                    m.euclidean_similarity,
                    config.weights.as_ref(),
                );
                let skill_match = self
                    .skill_matcher
                    .skill_match(&job.raw_text, &resumes[m.index].raw_text);

                RankedMatch {
                    id: resumes[m.index].id.clone(),
                    rank: m.rank,
                    similarity_score: m.similarity_score,
                    cosine_similarity: m.cosine_similarity,
                    euclidean_similarity: m.euclidean_similarity,
                    explanation,
                    skill_match,
                }
            })
            .collect();

        let job_description = ReferenceReport {
            statistics: self.preprocessor.text_statistics(&job.raw_text),
            skills: self.skill_matcher.extract_skills(&job.raw_text),
        };

        let resume_statistics: Vec<TextStatistics> = resumes
            .iter()
            .map(|doc| self.preprocessor.text_statistics(&doc.raw_text))
            .collect();

        Ok(RankingResponse {
            metric: config.metric,
            top_k: config.top_k,
            threshold: config.threshold,
            ranking_summary,
            job_description,
            matches,
            resumes: CandidateReport {
                count: resumes.len(),
                statistics: resume_statistics,
            },
        })
    }

    fn prepare_reference(&self, job_text: &str) -> Result<Document> {
        let normalized_text = self.normalizer.normalize(job_text);
        let preprocessed_text = self.preprocessor.preprocess(&normalized_text);

        let embedding = self.embedder.embed(&preprocessed_text).map_err(|e| {
            error!("Failed to embed job description: {}", e);
            ResumeRankerError::NoScorableCandidates
        })?;

        Ok(Document {
            id: "job_description".to_string(),
            raw_text: job_text.to_string(),
            normalized_text,
            preprocessed_text,
            embedding,
        })
    }

    fn prepare_candidates(&self, resume_texts: &[String]) -> Result<Vec<Document>> {
        let normalized: Vec<String> = resume_texts
            .iter()
            .map(|text| self.normalizer.normalize(text))
            .collect();

        let keyed: HashMap<String, String> = normalized
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("resume_{}", i), text.clone()))
            .collect();
        let mut preprocessed = self.preprocessor.preprocess_batch(&keyed);

        let ordered: Vec<String> = (0..resume_texts.len())
            .map(|i| preprocessed.remove(&format!("resume_{}", i)).unwrap_or_default())
            .collect();

        let embeddings = self.embedder.embed_batch(&ordered).map_err(|e| {
            error!("Failed to embed resumes: {}", e);
            ResumeRankerError::NoScorableCandidates
        })?;
        if embeddings.len() != resume_texts.len() {
            error!(
                "Embedding batch returned {} vectors for {} resumes",
                embeddings.len(),
                resume_texts.len()
            );
            return Err(ResumeRankerError::NoScorableCandidates);
        }

        Ok(resume_texts
            .iter()
            .zip(normalized)
            .zip(ordered)
            .zip(embeddings)
            .enumerate()
            .map(|(i, (((raw, norm), pre), embedding))| Document {
                id: format!("resume_{}", i),
                raw_text: raw.clone(),
                normalized_text: norm,
                preprocessed_text: pre,
                embedding,
            })
            .collect())
    }
}
