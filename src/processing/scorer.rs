//! Multi-metric similarity scoring over embedding vectors

use log::error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default weights for the configurable combination used in explanations.
const DEFAULT_COSINE_WEIGHT: f32 = 0.7;
const DEFAULT_EUCLIDEAN_WEIGHT: f32 = 0.3;

/// Qualitative description breakpoints, keyed off the cosine signal. These
/// are distinct from the ranking summary's 0.7/0.4 distribution thresholds.
const VERY_HIGH_SIMILARITY: f32 = 0.8;
const HIGH_SIMILARITY: f32 = 0.6;
const MODERATE_SIMILARITY: f32 = 0.4;

/// Raw similarity signals for one candidate, in input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScores {
    pub cosine: f32,
    pub euclidean: f32,
    pub combined: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityExplanation {
    pub cosine_similarity: f32,
    pub euclidean_similarity: f32,
    pub weighted_score: f32,
    pub explanation: String,
}

/// Cosine similarity, clamped to [0, 1]. Zero-norm vectors score 0.0 rather
/// than producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

/// Euclidean-derived similarity: `1 / (1 + L2 distance)`. Maps unbounded
/// distance into (0, 1], monotonically decreasing in distance, so the signal
/// points the same way as cosine and the two can be averaged directly.
pub fn euclidean_similarity(a: &[f32], b: &[f32]) -> f32 {
    let distance: f32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt();

    1.0 / (1.0 + distance)
}

/// Score every candidate against the reference. The combined score is the
/// plain 50/50 average of the two signals; this fixed combination is what
/// ranking uses. The weighted combiner below exists only for explanation
/// output.
///
/// Returns scores in input order. Any malformed input (dimension mismatch,
/// empty reference) is logged and collapses to an empty result, which callers
/// treat as "no candidates scorable".
pub fn score_candidates(reference: &[f32], candidates: &[Vec<f32>]) -> Vec<CandidateScores> {
    if candidates.is_empty() {
        return Vec::new();
    }
    if reference.is_empty() {
        error!("Reference embedding is empty; no candidates scorable");
        return Vec::new();
    }
    if let Some(bad) = candidates.iter().position(|c| c.len() != reference.len()) {
        error!(
            "Candidate {} embedding dimension {} does not match reference dimension {}",
            bad,
            candidates[bad].len(),
            reference.len()
        );
        return Vec::new();
    }

    candidates
        .iter()
        .map(|candidate| {
            let cosine = cosine_similarity(reference, candidate);
            let euclidean = euclidean_similarity(reference, candidate);
            CandidateScores {
                cosine,
                euclidean,
                combined: (cosine + euclidean) / 2.0,
            }
        })
        .collect()
}

/// Configurable-weight combination of the two signals. Not used for ranking;
/// it feeds the per-match explanation so callers can see how a non-uniform
/// weighting would have scored.
pub fn weighted_combination(
    cosine: f32,
    euclidean: f32,
    weights: Option<&HashMap<String, f32>>,
) -> f32 {
    let cosine_weight = weights
        .and_then(|w| w.get("cosine").copied())
        .unwrap_or(DEFAULT_COSINE_WEIGHT);
    let euclidean_weight = weights
        .and_then(|w| w.get("euclidean").copied())
        .unwrap_or(DEFAULT_EUCLIDEAN_WEIGHT);

    cosine_weight * cosine + euclidean_weight * euclidean
}

/// Human-readable account of a score pair, tiered off the cosine signal.
pub fn explain(
    cosine: f32,
    euclidean: f32,
    weights: Option<&HashMap<String, f32>>,
) -> SimilarityExplanation {
    let level = if cosine >= VERY_HIGH_SIMILARITY {
        "very high"
    } else if cosine >= HIGH_SIMILARITY {
        "high"
    } else if cosine >= MODERATE_SIMILARITY {
        "moderate"
    } else {
        "low"
    };

    let verdict = if cosine >= VERY_HIGH_SIMILARITY {
        "This indicates a strong match in terms of content and context."
    } else if cosine >= HIGH_SIMILARITY {
        "This suggests a good match with some differences in specific details."
    } else if cosine >= MODERATE_SIMILARITY {
        "There is some overlap in content, but significant differences exist."
    } else {
        "The documents appear to be quite different in terms of content and context."
    };

    let explanation = format!(
        "The documents show {} semantic similarity (cosine similarity: {:.2}, \
         euclidean similarity: {:.2}). {}",
        level, cosine, euclidean, verdict
    );

    SimilarityExplanation {
        cosine_similarity: cosine,
        euclidean_similarity: euclidean,
        weighted_score: weighted_combination(cosine, euclidean, weights),
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_of_identical_vectors() {
        let v = vec![0.5, 0.5, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_of_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_guard() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_is_clamped_to_unit_interval() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_euclidean_of_identical_vectors_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(euclidean_similarity(&v, &v), 1.0);
    }

    #[test]
    fn test_euclidean_decreases_with_distance() {
        let origin = vec![0.0, 0.0];
        let near = vec![1.0, 0.0];
        let far = vec![10.0, 0.0];
        assert!(euclidean_similarity(&origin, &near) > euclidean_similarity(&origin, &far));
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let reference = vec![0.3, -0.7, 0.2];
        let candidates = vec![vec![0.1, 0.9, -0.5], vec![-0.3, 0.7, -0.2]];

        for scores in score_candidates(&reference, &candidates) {
            assert!((0.0..=1.0).contains(&scores.cosine));
            assert!((0.0..=1.0).contains(&scores.euclidean));
            assert!((0.0..=1.0).contains(&scores.combined));
        }
    }

    #[test]
    fn test_no_candidates_yields_empty() {
        let reference = vec![1.0, 0.0];
        assert!(score_candidates(&reference, &[]).is_empty());
    }

    #[test]
    fn test_dimension_mismatch_yields_empty() {
        let reference = vec![1.0, 0.0];
        let candidates = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
        assert!(score_candidates(&reference, &candidates).is_empty());
    }

    #[test]
    fn test_combined_is_mean_of_signals() {
        let reference = vec![1.0, 0.0];
        let candidates = vec![vec![0.0, 1.0]];

        let scores = score_candidates(&reference, &candidates);
        let expected = (scores[0].cosine + scores[0].euclidean) / 2.0;
        assert!((scores[0].combined - expected).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_combination_defaults() {
        let score = weighted_combination(1.0, 0.0, None);
        assert!((score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_combination_custom_weights() {
        let mut weights = HashMap::new();
        weights.insert("cosine".to_string(), 0.5);
        weights.insert("euclidean".to_string(), 0.5);
        let score = weighted_combination(0.8, 0.4, Some(&weights));
        assert!((score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_explanation_tiers() {
        assert!(explain(0.85, 0.7, None).explanation.contains("very high"));
        assert!(explain(0.65, 0.5, None).explanation.contains("high"));
        assert!(explain(0.45, 0.4, None).explanation.contains("moderate"));
        assert!(explain(0.2, 0.3, None).explanation.contains("low"));
    }
}
