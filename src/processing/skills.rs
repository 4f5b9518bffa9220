//! Skill extraction and set-based skill matching

use crate::error::{Result, ResumeRankerError};
use aho_corasick::AhoCorasick;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Narrow interface for an entity recognizer collaborator. Implementations
/// return raw entity mentions (products, organizations, languages); the
/// matcher lowercases and merges them with dictionary hits. The crate ships
/// no NER backend; `NullRecognizer` is the production default and tests
/// substitute stubs.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> HashSet<String>;
}

/// Recognizer that finds nothing; dictionary scanning carries the matching.
pub struct NullRecognizer;

impl EntityRecognizer for NullRecognizer {
    fn recognize(&self, _text: &str) -> HashSet<String> {
        HashSet::new()
    }
}

/// Technical-term dictionary, grouped by category. Static configuration
/// data: the matching algorithm is independent of the content here.
const SKILL_DICTIONARY: [(&str, &[&str]); 6] = [
    (
        "programming",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "php", "swift",
            "kotlin", "go", "rust",
        ],
    ),
    (
        "frameworks",
        &[
            "react", "angular", "vue", "django", "flask", "spring", "express", "laravel", "rails",
            "asp.net",
        ],
    ),
    (
        "databases",
        &[
            "sql", "mysql", "postgresql", "mongodb", "redis", "oracle", "sqlite", "cassandra",
        ],
    ),
    (
        "cloud",
        &["aws", "azure", "gcp", "cloud", "docker", "kubernetes", "terraform"],
    ),
    (
        "tools",
        &["git", "jenkins", "jira", "confluence", "slack", "trello", "figma", "sketch"],
    ),
    (
        "methodologies",
        &["agile", "scrum", "kanban", "waterfall", "devops", "ci/cd"],
    ),
];

/// Skill overlap between a reference document and one candidate. Sets are
/// ordered so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub reference_skills: BTreeSet<String>,
    pub candidate_skills: BTreeSet<String>,
    pub matching: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub extra: BTreeSet<String>,
    pub match_ratio: f32,
}

pub struct SkillMatcher {
    recognizer: Arc<dyn EntityRecognizer>,
    automaton: AhoCorasick,
    terms: Vec<&'static str>,
    filler_regex: Regex,
}

impl SkillMatcher {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Result<Self> {
        let terms: Vec<&'static str> = SKILL_DICTIONARY
            .iter()
            .flat_map(|(_, terms)| terms.iter().copied())
            .collect();

        let automaton = AhoCorasick::new(&terms).map_err(|e| {
            ResumeRankerError::TextProcessing(format!("Failed to build skill matcher: {}", e))
        })?;

        let filler_regex =
            Regex::new(r"\b(and|or|the|a|an)\b").expect("Invalid filler-word regex");

        Ok(Self {
            recognizer,
            automaton,
            terms,
            filler_regex,
        })
    }

    /// Matcher with no recognizer backend; dictionary hits only.
    pub fn with_dictionary_only() -> Result<Self> {
        Self::new(Arc::new(NullRecognizer))
    }

    /// Extract the skill set of one document. Skill matching operates on raw
    /// text (original casing and punctuation): terms like "c++" would not
    /// survive normalization.
    ///
    /// Dictionary terms match by substring containment against the lowercased
    /// text. That deliberately trades precision for recall; "go" inside
    /// "django" is an accepted false positive.
    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        let lowered = text.to_lowercase();

        let mut skills: HashSet<String> = self
            .automaton
            .find_overlapping_iter(&lowered)
            .map(|m| self.terms[m.pattern().as_usize()].to_string())
            .collect();

        for entity in self.recognizer.recognize(text) {
            skills.insert(entity.to_lowercase());
        }

        skills
            .into_iter()
            .filter_map(|skill| self.clean_skill(&skill))
            .collect()
    }

    /// Strip filler words from a skill mention and discard what is left if it
    /// is too short to mean anything.
    fn clean_skill(&self, skill: &str) -> Option<String> {
        let stripped = self.filler_regex.replace_all(skill, "");
        let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.chars().count() > 1 {
            Some(cleaned)
        } else {
            None
        }
    }

    /// Compare skill sets between a reference document and one candidate.
    /// `match_ratio` is matched-over-required, defined as zero when the
    /// reference mentions no recognizable skills.
    pub fn skill_match(&self, reference_text: &str, candidate_text: &str) -> SkillMatch {
        let reference_skills = self.extract_skills(reference_text);
        let candidate_skills = self.extract_skills(candidate_text);

        let matching: BTreeSet<String> = reference_skills
            .intersection(&candidate_skills)
            .cloned()
            .collect();
        let missing: BTreeSet<String> = reference_skills
            .difference(&candidate_skills)
            .cloned()
            .collect();
        let extra: BTreeSet<String> = candidate_skills
            .difference(&reference_skills)
            .cloned()
            .collect();

        let match_ratio = if reference_skills.is_empty() {
            0.0
        } else {
            matching.len() as f32 / reference_skills.len() as f32
        };

        debug!(
            "Skill match: {} required, {} matched, {} missing",
            reference_skills.len(),
            matching.len(),
            missing.len()
        );

        SkillMatch {
            reference_skills,
            candidate_skills,
            matching,
            missing,
            extra,
            match_ratio,
        }
    }
}
