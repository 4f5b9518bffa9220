//! Console and JSON reports for a ranking response

use crate::error::Result;
use crate::processing::pipeline::{RankedMatch, RankingResponse};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Json,
}

impl ReportFormat {
    /// Unknown format names default to console output.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "json" => ReportFormat::Json,
            _ => ReportFormat::Console,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    response: &'a RankingResponse,
}

pub fn render(response: &RankingResponse, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => {
            let report = JsonReport {
                generated_at: Utc::now(),
                response,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        ReportFormat::Console => Ok(render_console(response)),
    }
}

fn render_console(response: &RankingResponse) -> String {
    let mut out = String::new();
    let summary = &response.ranking_summary;

    let _ = writeln!(out, "{}", "Resume Ranking Report".bold());
    let _ = writeln!(out, "Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(
        out,
        "Metric: {} | top_k: {} | threshold: {:.2}",
        response.metric, response.top_k, response.threshold
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{} resumes scored, average {}",
        summary.total_matches,
        percent(summary.average_score)
    );
    let _ = writeln!(
        out,
        "Distribution: {} high / {} medium / {} low",
        summary.score_distribution.high.to_string().green(),
        summary.score_distribution.medium.to_string().yellow(),
        summary.score_distribution.low.to_string().red(),
    );
    let _ = writeln!(out);

    for m in &response.matches {
        render_match(&mut out, m);
    }

    if !response.job_description.skills.is_empty() {
        let skills: Vec<&str> = response
            .job_description
            .skills
            .iter()
            .map(String::as_str)
            .collect();
        let _ = writeln!(out, "{} {}", "Job requires:".bold(), skills.join(", "));
    }

    out
}

fn render_match(out: &mut String, m: &RankedMatch) {
    let score = percent(m.similarity_score);
    let colored_score = if m.similarity_score >= 0.7 {
        score.green()
    } else if m.similarity_score >= 0.4 {
        score.yellow()
    } else {
        score.red()
    };

    let _ = writeln!(out, "{} {} ({})", format!("#{}", m.rank).bold(), m.id, colored_score);
    let _ = writeln!(
        out,
        "   cosine {:.3} | euclidean {:.3}",
        m.cosine_similarity, m.euclidean_similarity
    );
    let _ = writeln!(out, "   {}", m.explanation.explanation);

    let skills = &m.skill_match;
    let _ = writeln!(
        out,
        "   skills: {:.0}% match",
        skills.match_ratio * 100.0
    );
    if !skills.matching.is_empty() {
        let _ = writeln!(out, "   {} {}", "matching:".green(), join(&skills.matching));
    }
    if !skills.missing.is_empty() {
        let _ = writeln!(out, "   {} {}", "missing:".red(), join(&skills.missing));
    }
    if !skills.extra.is_empty() {
        let _ = writeln!(out, "   {} {}", "extra:".cyan(), join(&skills.extra));
    }
    let _ = writeln!(out);
}

fn join(set: &std::collections::BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn percent(score: f32) -> String {
    format!("{:.1}%", score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing_defaults_to_console() {
        assert_eq!(ReportFormat::parse("json"), ReportFormat::Json);
        assert_eq!(ReportFormat::parse("JSON"), ReportFormat::Json);
        assert_eq!(ReportFormat::parse("console"), ReportFormat::Console);
        assert_eq!(ReportFormat::parse("yaml"), ReportFormat::Console);
    }
}
