//! Text normalization and extraction-artifact repair

use regex::Regex;

/// Fraction of tokens on a line that must be single characters before the
/// line is treated as artifact-spaced PDF output.
const SPACED_LINE_RATIO: f64 = 0.7;

/// Minimum fraction of alphanumeric characters a line needs to survive the
/// noise filter. Separator lines (runs of underscores or dashes) fall below.
const MIN_ALNUM_RATIO: f64 = 0.3;

pub struct TextNormalizer {
    url_regex: Regex,
    email_regex: Regex,
    symbol_regex: Regex,
    digit_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let url_regex = Regex::new(r"(?:https?://|www\.)\S+").expect("Invalid URL regex");
        let email_regex = Regex::new(r"\S+@\S+").expect("Invalid email regex");
        let symbol_regex = Regex::new(r"[^\w\s]").expect("Invalid symbol regex");
        let digit_regex = Regex::new(r"\d+").expect("Invalid digit regex");

        Self {
            url_regex,
            email_regex,
            symbol_regex,
            digit_regex,
        }
    }

    /// Clean raw extracted text: repair spaced-out lines, lowercase, drop
    /// noise lines, strip URLs/emails/symbols/digits, collapse whitespace.
    ///
    /// Total over all inputs; empty or blank input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let lines: Vec<String> = text
            .lines()
            .map(Self::repair_spaced_line)
            .map(|line| line.to_lowercase())
            .filter(|line| !Self::is_noise_line(line))
            .collect();

        let mut cleaned = lines.join("\n");
        cleaned = self.url_regex.replace_all(&cleaned, "").to_string();
        cleaned = self.email_regex.replace_all(&cleaned, "").to_string();
        cleaned = self.symbol_regex.replace_all(&cleaned, " ").to_string();
        cleaned = self.digit_regex.replace_all(&cleaned, "").to_string();

        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Rejoin lines where each letter was emitted as its own token, a common
    /// PDF extraction defect. Lines where more than 70% of tokens are single
    /// characters are concatenated without separators; anything else passes
    /// through unchanged.
    fn repair_spaced_line(line: &str) -> String {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return line.to_string();
        }

        let single = tokens.iter().filter(|t| t.chars().count() == 1).count();
        if single as f64 / tokens.len() as f64 > SPACED_LINE_RATIO {
            tokens.concat()
        } else {
            line.to_string()
        }
    }

    /// Lines that are mostly punctuation or whitespace carry no content.
    fn is_noise_line(line: &str) -> bool {
        let total = line.chars().count();
        let alnum = line.chars().filter(|c| c.is_alphanumeric()).count();
        alnum as f64 <= total as f64 * MIN_ALNUM_RATIO
    }
}
