//! Grading extraction: correction status, scores, penalty text, feedback.
//!
//! Grading lines are kind-independent platform furniture. The status word
//! sits near the top of the block (the segmenter folds a heading-merged
//! status into the first line); the score line reads "Se puntúa X sobre Y";
//! penalty rules and feedback keep their verbatim text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::{correct_section, correct_section_plural, parse_decimal};
use crate::model::{GradingInfo, GradingStatus, Issue, IssueCode, QuestionKind};

lazy_static! {
    /// "Se puntúa 1,50 sobre 2,00" — the awarded part is absent on
    /// unanswered questions
    static ref RE_SCORE: Regex = Regex::new(
        r"Se puntúa (?:([-+]?\d+(?:[.,]\d+)?) )?sobre (\d+(?:[.,]\d+)?)"
    )
    .unwrap();

    /// Penalty rule stem, any inflection ("penaliza", "penalización", …)
    static ref RE_PENALTY: Regex = Regex::new(r"(?i)penaliz").unwrap();

    /// Feedback opener phrases
    static ref RE_FEEDBACK: Regex =
        Regex::new(r"^(?:¡Correcto!|¡Incorrecto!|Efectivamente|No existe)").unwrap();
}

/// Lines scanned for the status word; it never appears deeper in a block.
const STATUS_SCAN_LINES: usize = 5;

fn parse_status(block_text: &str) -> Option<GradingStatus> {
    for line in block_text.lines().take(STATUS_SCAN_LINES) {
        match line.trim() {
            "Correcta" => return Some(GradingStatus::Correct),
            "Parcialmente correcta" => return Some(GradingStatus::PartiallyCorrect),
            "Incorrecta" => return Some(GradingStatus::Incorrect),
            _ => {}
        }
    }
    None
}

/// True when the kind's correct answer comes from the common disclosure
/// section. The matching extractor judges its own pairs section.
fn expects_disclosure(kind: QuestionKind) -> bool {
    matches!(
        kind,
        QuestionKind::SingleChoice
            | QuestionKind::MultiSelect
            | QuestionKind::Numeric
            | QuestionKind::ShortAnswerText
            | QuestionKind::ClozeLabeledBlanks
    )
}

/// Parse the grading information of a block. Returns `None` when the block
/// carries no grading at all (ungraded preview documents).
pub fn extract_grading(
    block_text: &str,
    kind: QuestionKind,
    config: &PipelineConfig,
) -> (Option<GradingInfo>, Vec<Issue>) {
    let mut issues = Vec::new();

    let status = parse_status(block_text);

    let (score_awarded, score_max) = match RE_SCORE.captures(block_text) {
        Some(caps) => (
            caps.get(1)
                .and_then(|m| parse_decimal(m.as_str()))
                .map(|(v, _)| v),
            parse_decimal(&caps[2]).map(|(v, _)| v),
        ),
        None => (None, None),
    };

    let penalty_rule_text = block_text
        .lines()
        .find(|line| RE_PENALTY.is_match(line))
        .map(|line| line.trim().to_string());

    let feedback = block_text
        .lines()
        .find(|line| RE_FEEDBACK.is_match(line.trim()))
        .map(|line| {
            line.trim()
                .chars()
                .take(config.feedback_max_len)
                .collect::<String>()
        });

    if expects_disclosure(kind)
        && correct_section(block_text).is_none()
        && correct_section_plural(block_text).is_none()
    {
        issues.push(Issue::warn(
            IssueCode::NoCorrectAnswerFound,
            "",
            "no correct-answer disclosure in the block",
        ));
    }

    if status == Some(GradingStatus::PartiallyCorrect) {
        if let (Some(awarded), Some(max)) = (score_awarded, score_max) {
            if awarded > 0.0 && awarded < max {
                issues.push(Issue::info(
                    IssueCode::PartialScoringDetected,
                    "",
                    format!("partial credit: {} of {}", awarded, max),
                ));
            }
        }
    }

    let grading = GradingInfo {
        status,
        score_awarded,
        score_max,
        penalty_rule_text,
        feedback,
    };
    if grading.is_empty() {
        (None, issues)
    } else {
        (Some(grading), issues)
    }
}
