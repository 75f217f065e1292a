//! Priority-ordered classification of question blocks.
//!
//! A block's kind is fixed by the first matching predicate in
//! [`CLASSIFIER_RULES`], evaluated top to bottom; lower-priority predicates
//! are not consulted even if they would also match. The order of the table
//! is a contract: changing it changes classification outcomes and is a
//! breaking change. When nothing matches, the kind falls back to
//! `short_answer_text` so the output never carries an "unknown" kind.

use std::collections::HashSet;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::extractors::media::MEDIA_CUE;
use crate::model::QuestionKind;

lazy_static! {
    /// Numbered sub-item at the start of a line ("1. ", "2. ")
    static ref RE_SUBITEM: Regex = Regex::new(r"(?m)^\d+\.\s").unwrap();

    /// Labeled blank at the start of a line ("TP:", "a:")
    static ref RE_LABELED_BLANK: Regex =
        Regex::new(r"(?m)^([A-Za-zÁÉÍÓÚÜÑáéíóúüñ]{1,4}):").unwrap();

    /// Answer label followed by a parseable number (comma or period decimal)
    static ref RE_NUMERIC_ANSWER: Regex =
        Regex::new(r"(?m)^(?:Respuesta|Valor):\s*[-+]?\d+(?:[.,]\d+)?\s*[☑✓✔]?\s*$").unwrap();

    /// Answer label with any content
    static ref RE_ANSWER_LABEL: Regex = Regex::new(r"(?m)^Respuesta:").unwrap();

    /// Start of the correct-answer disclosure section
    static ref RE_CORRECT_SECTION: Regex =
        Regex::new(r"(?i)La respuesta correcta es:").unwrap();

    /// A pairing arrow
    static ref RE_ARROW: Regex = Regex::new(r"→|->").unwrap();

    /// Association cue opening a matching prompt
    static ref RE_ASSOCIATION: Regex = Regex::new(r"(?i)\b(?:Asocia|Empareja|Relaciona)\b").unwrap();
}

/// Classification result: the fixed kind and whether it was the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: QuestionKind,
    /// True when no predicate matched and `short_answer_text` was assumed
    pub fell_back: bool,
}

/// A classifier predicate over a block's full text.
pub type Predicate = fn(&str, &PipelineConfig) -> bool;

/// The ordered rule cascade. First match wins; order is a contract.
pub static CLASSIFIER_RULES: &[(QuestionKind, Predicate)] = &[
    (QuestionKind::MultipartShortAnswer, is_multipart),
    (QuestionKind::Matching, is_matching),
    (QuestionKind::MultiSelect, is_multi_select),
    (QuestionKind::SingleChoice, is_single_choice),
    (QuestionKind::ClozeTable, is_cloze_table),
    (QuestionKind::ClozeLabeledBlanks, is_cloze_labeled_blanks),
    (QuestionKind::ExternalMediaReference, is_external_media),
    (QuestionKind::Numeric, is_numeric),
    (QuestionKind::ShortAnswerText, is_short_answer),
];

/// Assign a kind to a block via the rule cascade.
pub fn classify(text: &str, config: &PipelineConfig) -> Classification {
    for (kind, predicate) in CLASSIFIER_RULES {
        if predicate(text, config) {
            debug!("classified as {}", kind);
            return Classification {
                kind: *kind,
                fell_back: false,
            };
        }
    }
    debug!("no classifier predicate matched; falling back to short_answer_text");
    Classification {
        kind: QuestionKind::ShortAnswerText,
        fell_back: true,
    }
}

fn is_multipart(text: &str, _config: &PipelineConfig) -> bool {
    RE_SUBITEM.find_iter(text).count() >= 2
}

/// Matching: an association cue, or at least `matching_arrow_min` pairing
/// arrows inside the correct-answer section. One arrow with no association
/// word is too weak a signal (see DESIGN.md).
fn is_matching(text: &str, config: &PipelineConfig) -> bool {
    if RE_ASSOCIATION.is_match(text) {
        return true;
    }
    match RE_CORRECT_SECTION.find(text) {
        Some(m) => RE_ARROW.find_iter(&text[m.end()..]).count() >= config.matching_arrow_min,
        None => false,
    }
}

fn is_multi_select(text: &str, _config: &PipelineConfig) -> bool {
    text.contains("Seleccione una o más de una")
}

fn is_single_choice(text: &str, _config: &PipelineConfig) -> bool {
    text.contains("Seleccione una:")
}

fn is_cloze_table(text: &str, _config: &PipelineConfig) -> bool {
    text.contains("Completa la tabla") || text.contains("Complete la tabla")
}

fn is_cloze_labeled_blanks(text: &str, _config: &PipelineConfig) -> bool {
    let labels: HashSet<&str> = RE_LABELED_BLANK
        .captures_iter(text)
        .map(|caps| caps.get(1).map(|m| m.as_str()).unwrap_or(""))
        .collect();
    labels.len() >= 2
}

fn is_external_media(text: &str, _config: &PipelineConfig) -> bool {
    MEDIA_CUE.is_match(text)
}

fn is_numeric(text: &str, _config: &PipelineConfig) -> bool {
    RE_NUMERIC_ANSWER.is_match(text)
}

fn is_short_answer(text: &str, _config: &PipelineConfig) -> bool {
    RE_ANSWER_LABEL.is_match(text)
}
