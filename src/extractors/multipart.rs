//! Extraction for multipart short-answer questions.
//!
//! Items are numbered `1.`, `2.`, … with their own prompt; each item may
//! carry an inline disclosure and nested labeled sub-answers. A block that
//! yields fewer than two items is later downgraded by the conformance
//! corrector, so the extractor reports what it found without judging it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::{has_check_mark, strip_marks};
use crate::model::{Issue, IssueCode, LabeledBlank, MultipartItem, QuestionContent};

lazy_static! {
    /// Item start: a printed ordinal at the beginning of a line
    static ref RE_ITEM_START: Regex = Regex::new(r"^(\d+)\.\s*(.*)$").unwrap();

    /// Inline disclosure inside an item
    static ref RE_ITEM_DISCLOSED: Regex =
        Regex::new(r"(?i)La respuesta correcta es:\s*(.+)").unwrap();

    /// A labeled sub-answer within an item ("A: modus ponens")
    static ref RE_SUBITEM: Regex =
        Regex::new(r"^([A-Za-zÁÉÍÓÚÜÑáéíóúüñ])\s*:\s*(.+)$").unwrap();

    /// Lines that terminate the item list
    static ref RE_ITEM_LIST_END: Regex =
        Regex::new(r"^(?:Se puntúa|¡Correcto!|¡Incorrecto!)").unwrap();
}

fn finish_item(lines: Vec<String>, index: u32) -> MultipartItem {
    let mut prompt_parts: Vec<String> = Vec::new();
    let mut expected: Option<String> = None;
    let mut user: Option<String> = None;
    let mut subitems: Vec<LabeledBlank> = Vec::new();

    for line in &lines {
        if let Some(caps) = RE_ITEM_DISCLOSED.captures(line) {
            let value = strip_marks(caps[1].trim().trim_end_matches('.'));
            if !value.is_empty() {
                expected = Some(value);
            }
            continue;
        }
        if let Some(caps) = RE_SUBITEM.captures(line) {
            let label = caps[1].to_string();
            let value = strip_marks(&caps[2]);
            if has_check_mark(line) {
                subitems.push(LabeledBlank {
                    label,
                    expected: None,
                    user: Some(value),
                });
            } else {
                subitems.push(LabeledBlank {
                    label,
                    expected: Some(value),
                    user: None,
                });
            }
            continue;
        }
        if has_check_mark(line) {
            let value = strip_marks(line);
            if !value.is_empty() && user.is_none() {
                user = Some(value);
                continue;
            }
        }
        prompt_parts.push(strip_marks(line));
    }

    MultipartItem {
        index,
        prompt: prompt_parts.join(" ").trim().to_string(),
        expected,
        user,
        subitems,
    }
}

/// Extract content for a multipart short-answer question.
pub fn extract_multipart(
    block_text: &str,
    _config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    let mut issues = Vec::new();
    let mut items: Vec<MultipartItem> = Vec::new();
    let mut open: Option<(u32, Vec<String>)> = None;

    for line in block_text.lines() {
        if let Some(caps) = RE_ITEM_START.captures(line) {
            if let Some((index, lines)) = open.take() {
                items.push(finish_item(lines, index));
            }
            let index = caps[1].parse::<u32>().unwrap_or(0);
            open = Some((index, vec![caps[2].to_string()]));
            continue;
        }
        if RE_ITEM_LIST_END.is_match(line) {
            if let Some((index, lines)) = open.take() {
                items.push(finish_item(lines, index));
            }
            continue;
        }
        if let Some((_, lines)) = open.as_mut() {
            lines.push(line.to_string());
        }
    }
    if let Some((index, lines)) = open.take() {
        items.push(finish_item(lines, index));
    }

    if items.iter().all(|item| item.expected.is_none())
        && items.iter().all(|item| item.subitems.is_empty())
    {
        issues.push(Issue::warn(
            IssueCode::NoCorrectAnswerFound,
            "",
            "no item carries a disclosed correct answer",
        ));
    }

    (QuestionContent::MultipartShortAnswer { items }, issues)
}
