//! Kind-specific structured content extraction.
//!
//! One extractor per question kind, each a pure function from block text to
//! a content payload plus zero or more local issues. Extractors never fail
//! on malformed input: they degrade to partial or empty content and report
//! the gap as an issue, leaving the verbatim block text untouched in
//! `raw.block_text`.

pub mod choice;
pub mod cloze;
pub mod matching;
pub mod media;
pub mod multipart;
pub mod numeric;
pub mod short_answer;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::model::{Issue, QuestionContent, QuestionKind};

lazy_static! {
    static ref RE_CORRECT_SECTION: Regex = Regex::new(r"(?i)La respuesta correcta es:").unwrap();
    static ref RE_CORRECT_SECTION_PLURAL: Regex =
        Regex::new(r"(?i)Las respuestas correctas son:").unwrap();
    static ref RE_DECIMAL: Regex = Regex::new(r"^[-+]?\d+(?:[.,]\d+)?$").unwrap();
}

/// Characters used by the platform to mark selected/correct options.
pub(crate) const CHECK_MARKS: &[char] = &['☑', '✓', '✔'];

/// Marks for unselected/wrong options; stripped alongside checkmarks.
pub(crate) const OTHER_MARKS: &[char] = &['☐', '✗', '✘'];

/// Remove selection marks from a text fragment and trim it.
pub(crate) fn strip_marks(text: &str) -> String {
    text.chars()
        .filter(|c| !CHECK_MARKS.contains(c) && !OTHER_MARKS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// True when the line carries a selection checkmark.
pub(crate) fn has_check_mark(line: &str) -> bool {
    line.chars().any(|c| CHECK_MARKS.contains(&c))
}

/// The text following "La respuesta correcta es:" to the end of the block,
/// or `None` when the disclosure is absent.
pub(crate) fn correct_section(text: &str) -> Option<&str> {
    RE_CORRECT_SECTION.find(text).map(|m| text[m.end()..].trim())
}

/// The text following "Las respuestas correctas son:" (multi-select form).
pub(crate) fn correct_section_plural(text: &str) -> Option<&str> {
    RE_CORRECT_SECTION_PLURAL
        .find(text)
        .map(|m| text[m.end()..].trim())
}

/// Parse a decimal value that may use comma or period as separator.
/// Returns the value and the separator observed.
pub(crate) fn parse_decimal(raw: &str) -> Option<(f64, char)> {
    let trimmed = raw.trim();
    if !RE_DECIMAL.is_match(trimmed) {
        return None;
    }
    let separator = if trimmed.contains(',') { ',' } else { '.' };
    trimmed.replace(',', ".").parse::<f64>().ok().map(|v| (v, separator))
}

/// Extract the content payload for a block based on its kind.
///
/// The returned issues are local to extraction; the flag engine and the
/// grading extractor contribute their own.
pub fn extract_content(
    kind: QuestionKind,
    block_text: &str,
    config: &PipelineConfig,
) -> (QuestionContent, Vec<Issue>) {
    match kind {
        QuestionKind::SingleChoice => choice::extract_single_choice(block_text, config),
        QuestionKind::MultiSelect => choice::extract_multi_select(block_text, config),
        QuestionKind::Matching => matching::extract_matching(block_text, config),
        QuestionKind::Numeric => numeric::extract_numeric(block_text, config),
        QuestionKind::ShortAnswerText => short_answer::extract_short_answer(block_text, config),
        QuestionKind::ClozeLabeledBlanks => cloze::extract_labeled_blanks(block_text, config),
        QuestionKind::ClozeTable => cloze::extract_cloze_table(block_text, config),
        QuestionKind::MultipartShortAnswer => multipart::extract_multipart(block_text, config),
        QuestionKind::ExternalMediaReference => media::extract_media_reference(block_text, config),
    }
}
