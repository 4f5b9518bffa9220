//! Linguistic preprocessing: stop-word removal and POS-aware lemmatization

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Part-of-speech buckets the lemmatizer distinguishes. Anything the tagger
/// cannot place defaults to noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosCategory {
    Adjective,
    Verb,
    Noun,
    Adverb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub word_count: usize,
    pub unique_words: usize,
    pub avg_word_length: f64,
    pub keyword_density: f64,
}

impl TextStatistics {
    fn empty() -> Self {
        Self {
            word_count: 0,
            unique_words: 0,
            avg_word_length: 0.0,
            keyword_density: 0.0,
        }
    }
}

pub struct Preprocessor {
    stop_words: HashSet<&'static str>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        let mut stop_words: HashSet<&'static str> = ENGLISH_STOP_WORDS.iter().copied().collect();
        stop_words.extend(DOMAIN_STOP_WORDS.iter().copied());
        Self { stop_words }
    }

    /// Reduce normalized text to a space-joined sequence of canonical lemmas.
    ///
    /// A token survives if it is fully alphanumeric, not a stop word, and
    /// longer than two characters. The stop-word test runs on the raw token,
    /// before lemmatization, so a lemma may coincide with a stop word and
    /// still be kept.
    pub fn preprocess(&self, text: &str) -> String {
        let lemmas: Vec<String> = text
            .split_whitespace()
            .filter(|token| {
                !token.is_empty()
                    && token.chars().all(char::is_alphanumeric)
                    && !self.stop_words.contains(token)
                    && token.chars().count() > 2
            })
            .map(|token| lemmatize(token, tag_pos(token)))
            .collect();

        lemmas.join(" ")
    }

    /// Preprocess a batch of documents, preserving keys. Entries are
    /// independent; no state crosses documents.
    pub fn preprocess_batch(&self, documents: &HashMap<String, String>) -> HashMap<String, String> {
        documents
            .iter()
            .map(|(id, text)| (id.clone(), self.preprocess(text)))
            .collect()
    }

    /// Basic statistics over raw (unnormalized) text. All fields are zero for
    /// empty input.
    pub fn text_statistics(&self, text: &str) -> TextStatistics {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.unicode_words().collect();
        if words.is_empty() {
            return TextStatistics::empty();
        }

        let unique: HashSet<&&str> = words.iter().collect();
        let total_length: usize = words.iter().map(|w| w.chars().count()).sum();
        let avg_word_length = total_length as f64 / words.len() as f64;

        let keywords = words
            .iter()
            .filter(|w| !self.stop_words.contains(**w))
            .count();
        let keyword_density = keywords as f64 / words.len() as f64 * 100.0;

        TextStatistics {
            word_count: words.len(),
            unique_words: unique.len(),
            avg_word_length: round2(avg_word_length),
            keyword_density: round2(keyword_density),
        }
    }

    /// Top keywords by frequency, stop words and short tokens excluded.
    /// Ties break alphabetically so output is deterministic.
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut freq: HashMap<&str, usize> = HashMap::new();

        for word in lowered.unicode_words() {
            if word.chars().count() > 2 && !self.stop_words.contains(word) {
                *freq.entry(word).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        ranked
            .into_iter()
            .take(top_n)
            .map(|(word, _)| word.to_string())
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Suffix-heuristic part-of-speech tagger. Stands in for a treebank tagger:
/// only the four-way split matters to the lemmatizer.
fn tag_pos(token: &str) -> PosCategory {
    const ADJECTIVE_SUFFIXES: [&str; 8] =
        ["ous", "ful", "ive", "able", "ible", "ish", "less", "ic"];

    if token.ends_with("ly") {
        PosCategory::Adverb
    } else if token.ends_with("ing") || token.ends_with("ed") {
        PosCategory::Verb
    } else if ADJECTIVE_SUFFIXES.iter().any(|s| token.ends_with(s)) {
        PosCategory::Adjective
    } else {
        PosCategory::Noun
    }
}

/// Reduce a token to its dictionary base form conditioned on part of speech.
/// Morphy-style suffix rewriting with a small irregular-form table; the same
/// surface form lemmatizes differently under different tags ("running" as a
/// verb becomes "run", as a noun stays "running").
fn lemmatize(token: &str, pos: PosCategory) -> String {
    match pos {
        PosCategory::Noun => lemmatize_noun(token),
        PosCategory::Verb => lemmatize_verb(token),
        PosCategory::Adjective => lemmatize_adjective(token),
        PosCategory::Adverb => token.to_string(),
    }
}

fn lemmatize_noun(token: &str) -> String {
    const IRREGULAR_NOUNS: [(&str, &str); 4] = [
        ("men", "man"),
        ("women", "woman"),
        ("people", "person"),
        ("children", "child"),
    ];

    if let Some((_, lemma)) = IRREGULAR_NOUNS.iter().find(|(form, _)| *form == token) {
        return (*lemma).to_string();
    }

    let n = token.len();
    for (suffix, replacement) in [("ches", "ch"), ("shes", "sh"), ("sses", "ss"), ("xes", "x"), ("zes", "z")] {
        if token.ends_with(suffix) {
            return format!("{}{}", &token[..n - suffix.len()], replacement);
        }
    }
    if token.ends_with("ies") && n > 4 {
        return format!("{}y", &token[..n - 3]);
    }
    if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") && !token.ends_with("is") && n > 3 {
        return token[..n - 1].to_string();
    }
    token.to_string()
}

fn lemmatize_verb(token: &str) -> String {
    const IRREGULAR_VERBS: [(&str, &str); 10] = [
        ("ran", "run"),
        ("built", "build"),
        ("led", "lead"),
        ("wrote", "write"),
        ("writing", "write"),
        ("went", "go"),
        ("made", "make"),
        ("held", "hold"),
        ("grew", "grow"),
        ("taught", "teach"),
    ];

    if let Some((_, lemma)) = IRREGULAR_VERBS.iter().find(|(form, _)| *form == token) {
        return (*lemma).to_string();
    }

    let n = token.len();
    if (token.ends_with("ied") || token.ends_with("ies")) && n > 4 {
        return format!("{}y", &token[..n - 3]);
    }
    if token.ends_with("ing") && n > 5 {
        return restore_stem(&token[..n - 3]);
    }
    if token.ends_with("ed") && n > 4 {
        return restore_stem(&token[..n - 2]);
    }
    if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") && !token.ends_with("is") && n > 3 {
        return token[..n - 1].to_string();
    }
    token.to_string()
}

fn lemmatize_adjective(token: &str) -> String {
    const IRREGULAR_ADJECTIVES: [(&str, &str); 4] = [
        ("better", "good"),
        ("best", "good"),
        ("worse", "bad"),
        ("worst", "bad"),
    ];

    if let Some((_, lemma)) = IRREGULAR_ADJECTIVES.iter().find(|(form, _)| *form == token) {
        return (*lemma).to_string();
    }

    let n = token.len();
    if token.ends_with("est") && n > 5 {
        return restore_stem(&token[..n - 3]);
    }
    if token.ends_with("er") && n > 4 {
        return restore_stem(&token[..n - 2]);
    }
    token.to_string()
}

/// Repair a stem left over after stripping an inflectional suffix: collapse a
/// doubled final consonant ("runn" -> "run") or restore a dropped final "e"
/// ("manag" -> "manage"). The ending lists cover the common cases; anything
/// else is left as stripped.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 3 {
        return stem.to_string();
    }

    let last = chars[n - 1];
    let prev = chars[n - 2];
    let is_consonant = |c: char| c.is_ascii_alphabetic() && !"aeiou".contains(c);

    if last == prev && is_consonant(last) && last != 'l' && last != 's' {
        return chars[..n - 1].iter().collect();
    }

    const E_ENDINGS: [&str; 5] = ["at", "ag", "iz", "ir", "ur"];
    if E_ENDINGS.iter().any(|s| stem.ends_with(s)) || matches!(last, 'c' | 'v' | 'u' | 'z') {
        return format!("{}e", stem);
    }

    stem.to_string()
}

/// Standard English stop words, matching the usual corpus list.
const ENGLISH_STOP_WORDS: [&str; 127] = [
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she",
    "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of",
    "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "s", "t", "can", "will", "just", "don", "should", "now",
];

/// Resume and job-description boilerplate that carries no signal.
const DOMAIN_STOP_WORDS: [&str; 20] = [
    "experience", "work", "job", "position", "role", "company", "year",
    "years", "month", "months", "day", "days", "skill", "skills",
    "responsibility", "responsibilities", "duty", "duties", "requirement",
    "requirements",
];
