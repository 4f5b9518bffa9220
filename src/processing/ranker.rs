//! Deterministic ranking and aggregate statistics

use crate::config::SimilarityConfig;
use crate::processing::scorer::CandidateScores;
use serde::{Deserialize, Serialize};

/// Score distribution buckets for the ranking summary.
const HIGH_SCORE_THRESHOLD: f32 = 0.7;
const MEDIUM_SCORE_THRESHOLD: f32 = 0.4;

/// How many leading matches the summary lists.
const TOP_RANKED_COUNT: usize = 3;

/// One ranked candidate. `index` is the candidate's position in submission
/// order; `rank` is 1-based and contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub index: usize,
    pub similarity_score: f32,
    pub cosine_similarity: f32,
    pub euclidean_similarity: f32,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMatch {
    pub rank: usize,
    pub index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSummary {
    pub total_matches: usize,
    pub average_score: f32,
    pub score_distribution: ScoreDistribution,
    pub top_ranked: Vec<TopMatch>,
}

impl RankingSummary {
    fn empty() -> Self {
        Self {
            total_matches: 0,
            average_score: 0.0,
            score_distribution: ScoreDistribution {
                high: 0,
                medium: 0,
                low: 0,
            },
            top_ranked: Vec::new(),
        }
    }
}

/// Order candidates by combined score, descending, and assign dense 1-based
/// ranks. The sort is stable, so candidates with exactly equal scores keep
/// their submission order; first submitted wins the tie.
pub fn rank_candidates(scores: &[CandidateScores]) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = scores
        .iter()
        .enumerate()
        .map(|(index, s)| MatchResult {
            index,
            similarity_score: s.combined,
            cosine_similarity: s.cosine,
            euclidean_similarity: s.euclidean,
            rank: 0,
        })
        .collect();

    results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));

    for (position, result) in results.iter_mut().enumerate() {
        result.rank = position + 1;
    }

    results
}

/// Aggregate statistics over the full ranked list.
pub fn ranking_summary(matches: &[MatchResult]) -> RankingSummary {
    if matches.is_empty() {
        return RankingSummary::empty();
    }

    let scores: Vec<f32> = matches.iter().map(|m| m.similarity_score).collect();
    let average_score = scores.iter().sum::<f32>() / scores.len() as f32;

    let score_distribution = ScoreDistribution {
        high: scores.iter().filter(|s| **s >= HIGH_SCORE_THRESHOLD).count(),
        medium: scores
            .iter()
            .filter(|s| **s >= MEDIUM_SCORE_THRESHOLD && **s < HIGH_SCORE_THRESHOLD)
            .count(),
        low: scores.iter().filter(|s| **s < MEDIUM_SCORE_THRESHOLD).count(),
    };

    let top_ranked = matches
        .iter()
        .take(TOP_RANKED_COUNT)
        .map(|m| TopMatch {
            rank: m.rank,
            index: m.index,
            score: m.similarity_score,
        })
        .collect();

    RankingSummary {
        total_matches: matches.len(),
        average_score,
        score_distribution,
        top_ranked,
    }
}

/// Restrict a ranked list to what the caller asked for: entries at or above
/// the threshold, truncated to the first `top_k`. Neither parameter affects
/// score computation or ranking order.
pub fn apply_limits(matches: Vec<MatchResult>, config: &SimilarityConfig) -> Vec<MatchResult> {
    matches
        .into_iter()
        .filter(|m| m.similarity_score >= config.threshold)
        .take(config.top_k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[f32]) -> Vec<CandidateScores> {
        values
            .iter()
            .map(|v| CandidateScores {
                cosine: *v,
                euclidean: *v,
                combined: *v,
            })
            .collect()
    }

    #[test]
    fn test_ranks_are_a_contiguous_permutation() {
        let ranked = rank_candidates(&scores(&[0.2, 0.9, 0.5, 0.7]));

        let mut ranks: Vec<usize> = ranked.iter().map(|m| m.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[1].index, 3);
        assert_eq!(ranked[2].index, 2);
        assert_eq!(ranked[3].index, 0);
    }

    #[test]
    fn test_ranking_is_descending_in_score() {
        let ranked = rank_candidates(&scores(&[0.1, 0.8, 0.3]));
        for pair in ranked.windows(2) {
            assert!(pair[0].similarity_score >= pair[1].similarity_score);
            assert!(pair[0].rank < pair[1].rank);
        }
    }

    #[test]
    fn test_exact_ties_keep_submission_order() {
        let ranked = rank_candidates(&scores(&[0.5, 0.9, 0.5, 0.5]));

        assert_eq!(ranked[0].index, 1);
        // All tied candidates retain their original relative order.
        assert_eq!(ranked[1].index, 0);
        assert_eq!(ranked[2].index, 2);
        assert_eq!(ranked[3].index, 3);
    }

    #[test]
    fn test_summary_of_empty_list() {
        let summary = ranking_summary(&[]);
        assert_eq!(summary.total_matches, 0);
        assert_eq!(summary.average_score, 0.0);
        assert!(summary.top_ranked.is_empty());
    }

    #[test]
    fn test_summary_buckets_and_average() {
        let ranked = rank_candidates(&scores(&[0.75, 0.5, 0.2, 0.4, 0.7]));
        let summary = ranking_summary(&ranked);

        assert_eq!(summary.total_matches, 5);
        assert_eq!(summary.score_distribution.high, 2);
        assert_eq!(summary.score_distribution.medium, 2);
        assert_eq!(summary.score_distribution.low, 1);
        assert!((summary.average_score - 0.51).abs() < 1e-6);
        assert_eq!(summary.top_ranked.len(), 3);
        assert_eq!(summary.top_ranked[0].rank, 1);
    }

    #[test]
    fn test_limits_filter_threshold_then_truncate() {
        let ranked = rank_candidates(&scores(&[0.9, 0.8, 0.3, 0.7, 0.6]));
        let config = SimilarityConfig {
            threshold: 0.5,
            top_k: 3,
            ..SimilarityConfig::default()
        };

        let limited = apply_limits(ranked, &config);
        assert_eq!(limited.len(), 3);
        assert!(limited.iter().all(|m| m.similarity_score >= 0.5));
        assert_eq!(limited[0].rank, 1);
    }

    #[test]
    fn test_limits_do_not_reorder() {
        let ranked = rank_candidates(&scores(&[0.2, 0.9]));
        let config = SimilarityConfig::default();

        let limited = apply_limits(ranked, &config);
        assert_eq!(limited[0].index, 1);
        assert_eq!(limited[1].index, 0);
    }
}
