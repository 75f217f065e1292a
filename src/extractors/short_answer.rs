//! Extraction for free-text short-answer questions.
//!
//! Also the fallback payload for blocks the classifier could not type: the
//! extractor tolerates blocks with neither a disclosure nor an answer label
//! and degrades to empty content.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::{correct_section, strip_marks};
use crate::model::{Issue, IssueCode, QuestionContent};

lazy_static! {
    static ref RE_USER: Regex = Regex::new(r"(?m)^Respuesta:\s*(.+)$").unwrap();
}

/// Extract content for a short-answer-text question.
pub fn extract_short_answer(
    block_text: &str,
    _config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    let mut issues = Vec::new();

    // Multiple accepted answers are comma-separated in the disclosure.
    let expected: Vec<String> = match correct_section(block_text) {
        Some(section) => section
            .lines()
            .next()
            .unwrap_or("")
            .trim_end_matches('.')
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        None => Vec::new(),
    };

    let user = RE_USER
        .captures(block_text)
        .map(|caps| strip_marks(&caps[1]))
        .filter(|value| !value.is_empty());

    if user.is_none() {
        issues.push(Issue::warn(
            IssueCode::UserAnswerNotFound,
            "",
            "no answer label found for the user's submission",
        ));
    }

    (QuestionContent::ShortAnswerText { expected, user }, issues)
}
