//! Segmentation of normalized pages into ordered question blocks.
//!
//! A primary delimiter is a "Pregunta N" heading line: it opens a new block
//! and closes the previous one. When a primary delimiter is missing or
//! merged with adjacent text, secondary markers re-anchor boundaries: every
//! question carries at most one score line and at most one selection or
//! table prompt, so a second occurrence of either inside one block splits
//! it, with the new block's number inferred by sequential continuation.
//! Block loss is forbidden — a block with unrecoverable boundaries is still
//! emitted with best-effort text.

use indexmap::IndexSet;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::model::{Issue, IssueCode, Question, QuestionBlock, DOCUMENT_SCOPE};
use crate::pipeline::normalize::NormalizedPage;

lazy_static! {
    /// Primary delimiter: question-number heading, optionally merged with
    /// the correction status that follows it in the source layout.
    static ref RE_PRIMARY: Regex = Regex::new(
        r"^Pregunta (\d+)(?: (Correcta|Incorrecta|Parcialmente correcta|Sin contestar|Finalizado.*))?$"
    )
    .unwrap();

    /// Score line, one per question; used as the re-anchoring cue.
    static ref RE_SCORE_LINE: Regex =
        Regex::new(r"^Se puntúa (?:-?\d+(?:[.,]\d+)? )?sobre \d+(?:[.,]\d+)?").unwrap();

    /// Secondary markers: the fixed closed set of cues that signal question
    /// content when no primary delimiter was seen yet.
    static ref RE_SECONDARY: Regex = Regex::new(
        r"^(?:Seleccione una:|Seleccione una o más de una:|Respuesta:|Valor:|Completa la tabla|Complete la tabla|Asocia |Empareja |Relaciona )"
    )
    .unwrap();

    /// Cues that occur at most once per question. A repeat inside one open
    /// block means a primary heading was missed, like a second score line.
    /// Answer labels are excluded: multipart questions legitimately carry
    /// several.
    static ref RE_ANCHOR: Regex = Regex::new(
        r"^(?:Seleccione una:|Seleccione una o más de una:|Completa la tabla|Complete la tabla)"
    )
    .unwrap();
}

struct OpenBlock {
    number: u32,
    inferred: bool,
    pages: IndexSet<usize>,
    lines: Vec<String>,
    scores_seen: usize,
    anchors_seen: usize,
}

impl OpenBlock {
    fn new(number: u32, inferred: bool, page: usize) -> Self {
        let mut pages = IndexSet::new();
        pages.insert(page);
        Self {
            number,
            inferred,
            pages,
            lines: Vec::new(),
            scores_seen: 0,
            anchors_seen: 0,
        }
    }

    fn close(self) -> QuestionBlock {
        let mut issues = Vec::new();
        if self.inferred {
            issues.push(Issue::info(
                IssueCode::IndexRemapped,
                Question::id_for(self.number),
                "question number inferred by sequential continuation (no primary heading found)",
            ));
        }
        QuestionBlock {
            number: self.number,
            pages: self.pages,
            text: self.lines.join("\n").trim().to_string(),
            issues,
        }
    }
}

/// Segment normalized pages into question blocks in document order.
///
/// Returns the blocks plus document-level issues (front matter that carried
/// no recognizable cue and was not attributed to any block).
pub fn segment_pages(pages: &[NormalizedPage]) -> (Vec<QuestionBlock>, Vec<Issue>) {
    let mut blocks: Vec<QuestionBlock> = Vec::new();
    let mut issues: Vec<Issue> = Vec::new();
    let mut current: Option<OpenBlock> = None;
    let mut preamble: Vec<String> = Vec::new();

    for (page_index, page) in pages.iter().enumerate() {
        for line in &page.lines {
            if let Some(caps) = RE_PRIMARY.captures(line) {
                // Heading numbers are short digit runs; a failed parse only
                // happens on absurd input, which we treat as body text.
                if let Ok(number) = caps[1].parse::<u32>() {
                    if let Some(block) = current.take() {
                        blocks.push(block.close());
                    }
                    let mut block = OpenBlock::new(number, false, page_index);
                    if let Some(status) = caps.get(2) {
                        // Merged heading: keep the status as the first line
                        block.lines.push(status.as_str().to_string());
                    }
                    current = Some(block);
                    continue;
                }
            }

            let is_score_line = RE_SCORE_LINE.is_match(line);
            let is_anchor = RE_ANCHOR.is_match(line);
            let reanchor = current
                .as_ref()
                .map(|b| {
                    (is_score_line && b.scores_seen >= 1)
                        || (is_anchor && b.anchors_seen >= 1)
                })
                .unwrap_or(false);
            if reanchor {
                // A second score line or once-per-question cue cluster in
                // one block: a primary heading was missed. Re-anchor here.
                if let Some(finished) = current.take() {
                    let next_number = finished.number.saturating_add(1);
                    blocks.push(finished.close());
                    let mut block = OpenBlock::new(next_number, true, page_index);
                    if is_score_line {
                        block.scores_seen = 1;
                    }
                    if is_anchor {
                        block.anchors_seen = 1;
                    }
                    block.lines.push(line.clone());
                    current = Some(block);
                }
                continue;
            }

            match current.as_mut() {
                Some(block) => {
                    if is_score_line {
                        block.scores_seen += 1;
                    }
                    if is_anchor {
                        block.anchors_seen += 1;
                    }
                    block.pages.insert(page_index);
                    block.lines.push(line.clone());
                }
                None => {
                    if RE_SECONDARY.is_match(line) || is_score_line {
                        // Question content before any heading: open an
                        // inferred block and claim the preamble for it.
                        let number =
                            blocks.last().map(|b| b.number.saturating_add(1)).unwrap_or(1);
                        let mut block = OpenBlock::new(number, true, page_index);
                        block.lines.append(&mut preamble);
                        if is_score_line {
                            block.scores_seen = 1;
                        }
                        if is_anchor {
                            block.anchors_seen = 1;
                        }
                        block.lines.push(line.clone());
                        current = Some(block);
                    } else {
                        preamble.push(line.clone());
                    }
                }
            }
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block.close());
    }

    if !preamble.is_empty() {
        if blocks.is_empty() {
            warn!("no question blocks detected in {} pages", pages.len());
        }
        issues.push(Issue::info(
            IssueCode::HeaderFooterUncertain,
            DOCUMENT_SCOPE,
            format!(
                "{} front-matter line(s) not attributed to any question block",
                preamble.len()
            ),
        ));
    }

    debug!("segmented {} pages into {} blocks", pages.len(), blocks.len());
    (blocks, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(lines: &[&str]) -> NormalizedPage {
        NormalizedPage {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_primary_delimiters_split_blocks() {
        let pages = vec![page(&[
            "Pregunta 1",
            "Correcta",
            "Se puntúa 1,00 sobre 1,00",
            "¿2+2?",
            "Pregunta 2",
            "Incorrecta",
            "Se puntúa 0,00 sobre 1,00",
            "¿3+3?",
        ])];
        let (blocks, issues) = segment_pages(&pages);
        assert!(issues.is_empty());
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].number, 1);
        assert_eq!(blocks[1].number, 2);
        assert!(blocks[0].text.contains("¿2+2?"));
        assert!(!blocks[0].text.contains("¿3+3?"));
        assert!(blocks[0].issues.is_empty());
    }

    #[test]
    fn test_block_spanning_pages_records_both() {
        let pages = vec![
            page(&["Pregunta 4", "Correcta", "Se puntúa 2,00 sobre 2,00", "inicio"]),
            page(&["continuación", "Respuesta: hola"]),
        ];
        let (blocks, _) = segment_pages(&pages);
        assert_eq!(blocks.len(), 1);
        let pages_vec: Vec<usize> = blocks[0].pages.iter().copied().collect();
        assert_eq!(pages_vec, vec![0, 1]);
        assert!(blocks[0].text.contains("continuación"));
    }

    #[test]
    fn test_merged_heading_keeps_status() {
        let pages = vec![page(&["Pregunta 7 Correcta", "Se puntúa 1,00 sobre 1,00"])];
        let (blocks, _) = segment_pages(&pages);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].number, 7);
        assert!(blocks[0].text.starts_with("Correcta"));
    }

    #[test]
    fn test_missing_heading_reanchors_on_second_score_line() {
        let pages = vec![page(&[
            "Pregunta 3",
            "Correcta",
            "Se puntúa 1,00 sobre 1,00",
            "Respuesta: 5",
            // "Pregunta 4" heading lost by the extractor
            "Incorrecta",
            "Se puntúa 0,00 sobre 1,00",
            "Respuesta: 9",
        ])];
        let (blocks, _) = segment_pages(&pages);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].number, 4);
        assert_eq!(blocks[1].issues.len(), 1);
        assert_eq!(blocks[1].issues[0].code, IssueCode::IndexRemapped);
        assert!(blocks[1].text.contains("Respuesta: 9"));
        assert!(!blocks[0].text.contains("Respuesta: 9"));
    }

    #[test]
    fn test_missing_heading_reanchors_on_second_selection_cue() {
        // No headings and no score lines: the second "Seleccione una:" is
        // the only boundary signal left.
        let pages = vec![page(&[
            "Seleccione una:",
            "a. p",
            "b. q ☑",
            "La respuesta correcta es: b",
            "Seleccione una:",
            "a. r ☑",
            "b. s",
            "La respuesta correcta es: a",
        ])];
        let (blocks, _) = segment_pages(&pages);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].number, 1);
        assert_eq!(blocks[1].number, 2);
        assert!(blocks[1].issues.iter().any(|i| i.code == IssueCode::IndexRemapped));
        assert!(blocks[0].text.contains("b. q"));
        assert!(!blocks[0].text.contains("a. r"));
        assert!(blocks[1].text.contains("a. r"));
    }

    #[test]
    fn test_answer_labels_do_not_reanchor() {
        // Multipart blocks carry several answer labels; they must all stay
        // inside one block.
        let pages = vec![page(&[
            "Pregunta 5",
            "Se puntúa 2,00 sobre 2,00",
            "1. primera parte",
            "Respuesta: x",
            "2. segunda parte",
            "Respuesta: y",
        ])];
        let (blocks, _) = segment_pages(&pages);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].text.contains("Respuesta: x"));
        assert!(blocks[0].text.contains("Respuesta: y"));
    }

    #[test]
    fn test_content_before_first_heading_becomes_inferred_block() {
        let pages = vec![page(&[
            "¿Cuánto es 2+2?",
            "Respuesta: 4",
            "Pregunta 2",
            "Se puntúa sobre 1,00",
            "¿Cuánto es 3+3?",
        ])];
        let (blocks, _) = segment_pages(&pages);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].number, 1);
        assert!(blocks[0].issues.iter().any(|i| i.code == IssueCode::IndexRemapped));
        assert!(blocks[0].text.contains("¿Cuánto es 2+2?"));
    }

    #[test]
    fn test_cue_free_front_matter_reported_at_document() {
        let pages = vec![page(&[
            "Universidad de Burgos",
            "Comenzado el lunes",
            "Pregunta 1",
            "Se puntúa sobre 1,00",
            "contenido",
        ])];
        let (blocks, issues) = segment_pages(&pages);
        assert_eq!(blocks.len(), 1);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::HeaderFooterUncertain);
        assert_eq!(issues[0].where_, DOCUMENT_SCOPE);
    }

    #[test]
    fn test_no_blocks_on_empty_input() {
        let (blocks, issues) = segment_pages(&[]);
        assert!(blocks.is_empty());
        assert!(issues.is_empty());
    }
}
